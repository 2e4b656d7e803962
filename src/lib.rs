//! killwatch listens to the zKillboard RedisQ feed, resolves participant names
//! through ESI, caches each killmail and republishes it on a Valkey pub/sub
//! channel. The alert bot subscribes to that channel, keeps killmails from the
//! watched regions, measures the distance in jumps from a home system and posts a
//! one-line summary to Discord.

pub mod alert;
pub mod bus;
pub mod config;
pub mod data;
pub mod error;
pub mod listener;
pub mod model;
pub mod service;
pub mod startup;
