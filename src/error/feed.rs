//! RedisQ feed errors.
//!
//! Every variant is transient. The listener answers all of them with the tiered
//! backoff and never gives up on the feed.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// RedisQ answered with something other than 200 OK.
    #[error("Status code {status} for {url}")]
    Status { status: u16, url: String },
    /// The long-poll did not complete within the client timeout.
    #[error("Request timed out for {url}")]
    Timeout { url: String },
    /// Connection, TLS or protocol failure.
    #[error("Error fetching from RedisQ {url}: {error}")]
    Transport {
        url: String,
        #[source]
        error: reqwest::Error,
    },
    /// RedisQ answered 200 OK but the body was not JSON.
    #[error("Undecodable body from {url}: {reason}")]
    Body { url: String, reason: String },
}
