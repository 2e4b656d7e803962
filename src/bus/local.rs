use dioxus_logger::tracing;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    bus::{Broadcaster, Subscription},
    error::Error,
};

/// In-process bus over [`tokio::sync::broadcast`].
///
/// Lines sent while nobody is subscribed are dropped, a subscriber that falls
/// more than `capacity` lines behind skips the oldest ones.
#[derive(Clone, Debug)]
pub struct LocalBus {
    topic: String,
    tx: broadcast::Sender<String>,
}

impl LocalBus {
    /// Create a bus holding at most `capacity` undelivered lines (minimum 1)
    pub fn new(topic: impl Into<String>, capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            topic: topic.into(),
            tx,
        }
    }

    /// Subscribe to lines published after this call
    pub fn subscribe(&self) -> LocalSubscription {
        LocalSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Broadcaster for LocalBus {
    fn topic(&self) -> &str {
        &self.topic
    }

    async fn publish(&self, line: &str) -> Result<(), Error> {
        // An error only means there are no subscribers right now
        let _ = self.tx.send(line.to_string());
        Ok(())
    }
}

pub struct LocalSubscription {
    rx: broadcast::Receiver<String>,
}

impl Subscription for LocalSubscription {
    async fn recv(&mut self) -> Option<String> {
        loop {
            match self.rx.recv().await {
                Ok(line) => return Some(line),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Bus subscriber lagged, skipped {} messages", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_every_subscriber() {
        let bus = LocalBus::new("zkb", 16);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish("zkb {}").await.unwrap();

        assert_eq!(first.recv().await.as_deref(), Some("zkb {}"));
        assert_eq!(second.recv().await.as_deref(), Some("zkb {}"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_succeeds() {
        let bus = LocalBus::new("zkb", 16);

        assert!(bus.publish("zkb {}").await.is_ok());
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_lines() {
        let bus = LocalBus::new("zkb", 16);
        bus.publish("zkb first").await.unwrap();

        let mut subscription = bus.subscribe();
        bus.publish("zkb second").await.unwrap();

        assert_eq!(subscription.recv().await.as_deref(), Some("zkb second"));
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_oldest_lines() {
        let bus = LocalBus::new("zkb", 2);
        let mut subscription = bus.subscribe();

        for i in 0..4 {
            bus.publish(&format!("zkb {}", i)).await.unwrap();
        }

        assert_eq!(subscription.recv().await.as_deref(), Some("zkb 2"));
        assert_eq!(subscription.recv().await.as_deref(), Some("zkb 3"));
    }

    #[tokio::test]
    async fn recv_ends_when_bus_is_dropped() {
        let bus = LocalBus::new("zkb", 2);
        let mut subscription = bus.subscribe();

        drop(bus);

        assert_eq!(subscription.recv().await, None);
    }
}
