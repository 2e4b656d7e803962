//! Pub/sub bus between the listener and the alert bots.
//!
//! Every message is one line of text, `"<topic> <json>"`, built by
//! [`BusMessage::encode`](crate::model::message::BusMessage::encode). Delivery is
//! at-most-once: a subscriber that is down or lagging misses whatever was
//! published in the meantime, and the publisher is never told.
//!
//! - [`redis::RedisBus`] publishes on a Valkey/Redis channel named after the topic
//!   and is what the binaries use.
//! - [`local::LocalBus`] keeps everything inside one process.

pub mod local;
pub mod redis;

use crate::error::Error;

/// Publishing half of the bus.
#[allow(async_fn_in_trait)]
pub trait Broadcaster {
    /// Topic prefixed to every line published through this broadcaster
    fn topic(&self) -> &str;

    /// Publish one wire line to the current subscribers
    async fn publish(&self, line: &str) -> Result<(), Error>;
}

/// Receiving half of the bus.
#[allow(async_fn_in_trait)]
pub trait Subscription {
    /// Wait for the next wire line, `None` once the bus is closed
    async fn recv(&mut self) -> Option<String>;
}
