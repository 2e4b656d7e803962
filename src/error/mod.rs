//! Error types for killwatch.
//!
//! Domain errors live in their own submodules (configuration, feed fetching, route
//! search) and are aggregated into the crate-wide [`Error`] together with the
//! external library errors, so `?` works across repositories, services and run loops.
//! None of these are fatal to a run loop; each loop decides whether to back off,
//! drop the current killmail, or log and continue.

pub mod config;
pub mod feed;
pub mod retry;
pub mod route;

use thiserror::Error;

use crate::error::{config::ConfigError, feed::FeedError, route::RouteError};

/// Main error type for killwatch.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Transient failure fetching from the RedisQ feed.
    #[error(transparent)]
    FeedError(#[from] FeedError),
    /// Route search aborted, which indicates a corrupt jump graph.
    #[error(transparent)]
    RouteError(#[from] RouteError),
    /// A killmail or bus message is missing a field we depend on.
    #[error("Malformed killmail payload: {0}")]
    MalformedPayload(String),
    /// Publishing a message on the bus failed.
    #[error("Failed to publish on the bus: {0}")]
    BusError(String),
    /// Delivering an alert to the outbound channel failed.
    #[error("Failed to deliver alert: {0}")]
    NotifyError(String),
    /// ESI client error (API requests, rate limiting).
    #[error(transparent)]
    EsiError(#[from] eve_esi::Error),
    /// Database error (killmail cache, name cache or static data).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Valkey/Redis error from the bus connection.
    #[error(transparent)]
    RedisError(#[from] fred::prelude::Error),
    /// HTTP client error outside of the feed (webhook delivery, client construction).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// JSON serialization error.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}
