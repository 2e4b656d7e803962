use dioxus_logger::tracing;
use fred::{clients::SubscriberClient, prelude::*, types::Message};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    bus::{Broadcaster, Subscription},
    error::Error,
};

/// Publishes wire lines on the Valkey/Redis channel named after the topic.
pub struct RedisBus {
    pool: Pool,
    topic: String,
}

impl RedisBus {
    /// Wrap a connected pool, see `startup::connect_to_bus`
    pub fn new(pool: Pool, topic: impl Into<String>) -> Self {
        Self {
            pool,
            topic: topic.into(),
        }
    }
}

impl Broadcaster for RedisBus {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, line: &str) -> Result<(), Error> {
        let receivers: i64 = self
            .pool
            .next()
            .publish(self.topic.as_str(), line)
            .await?;

        tracing::debug!("Published on {} to {} subscribers", self.topic, receivers);

        Ok(())
    }
}

/// Receives wire lines from the Valkey/Redis channel named after the topic.
pub struct RedisSubscription {
    // Kept alive for as long as messages are read from `message_rx`
    _client: SubscriberClient,
    message_rx: broadcast::Receiver<Message>,
}

impl RedisSubscription {
    /// Subscribe an initialized subscriber client to the topic channel
    pub async fn subscribe(client: SubscriberClient, topic: &str) -> Result<Self, Error> {
        // Take the receiver first so nothing published after SUBSCRIBE is missed
        let message_rx = client.message_rx();
        client.subscribe(topic).await?;

        Ok(Self {
            _client: client,
            message_rx,
        })
    }
}

impl Subscription for RedisSubscription {
    async fn recv(&mut self) -> Option<String> {
        loop {
            match self.message_rx.recv().await {
                Ok(message) => match message.value.convert::<String>() {
                    Ok(line) => return Some(line),
                    Err(e) => {
                        tracing::warn!("Ignoring non-text message on {}: {}", &*message.channel, e);
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Bus subscriber lagged, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
