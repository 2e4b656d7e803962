//! Killmail, actor name and bus message models.
//!
//! Killmails are parsed into typed structs for the fields the pipeline reads, while
//! every other field of the RedisQ payload is kept so the cache and bus carry the
//! killmail exactly as it was received.

pub mod killmail;
pub mod message;
pub mod names;
