//! RedisQ listener, the producer side of killwatch.
//!
//! One sequential loop: poll RedisQ, cache the raw killmail, resolve participant
//! names, publish on the bus. Only one poll is ever outstanding and a backoff
//! sleep blocks the loop. Caching and publishing are best-effort, their failures
//! are logged and the loop carries on with the next poll.

pub mod backoff;
pub mod feed;
pub mod sleep;

use std::future::Future;

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::{
    bus::Broadcaster,
    data::killmail::KillmailRepository,
    error::Error,
    listener::{
        backoff::{Backoff, BackoffAction, BackoffTier},
        feed::RedisqClient,
        sleep::Sleeper,
    },
    model::{killmail::Killmail, message::BusMessage},
    service::names::NameService,
};

/// Result of a single [`Listener::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Killmail was cached (best-effort) and published
    Published(i64),
    /// Killmail was cached (best-effort) but publishing failed
    PublishFailed(i64),
    /// RedisQ had nothing for this poll window
    Idle,
    /// RedisQ delivered something that is not a usable killmail
    Dropped,
    /// The poll failed and the listener slept before returning
    BackedOff(BackoffAction),
}

pub struct Listener<'a, B, S> {
    feed: &'a RedisqClient,
    db: &'a DatabaseConnection,
    esi_client: &'a eve_esi::Client,
    bus: &'a B,
    sleeper: S,
    backoff: Backoff,
}

impl<'a, B, S> Listener<'a, B, S>
where
    B: Broadcaster,
    S: Sleeper,
{
    pub fn new(
        feed: &'a RedisqClient,
        db: &'a DatabaseConnection,
        esi_client: &'a eve_esi::Client,
        bus: &'a B,
        sleeper: S,
    ) -> Self {
        Self {
            feed,
            db,
            esi_client,
            bus,
            sleeper,
            backoff: Backoff::new(),
        }
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Poll once and handle whatever came back
    pub async fn step(&mut self) -> StepOutcome {
        match self.feed.poll().await {
            Ok(Some(raw)) => self.handle_killmail(raw).await,
            Ok(None) => StepOutcome::Idle,
            Err(e) => {
                let action = self.backoff.on_failure();
                match action.tier {
                    BackoffTier::Short => tracing::warn!(
                        "Short term failure {}, sleeping {:?}: {}",
                        action.count,
                        action.delay,
                        e
                    ),
                    BackoffTier::Long => tracing::warn!(
                        "Long term failure {}, sleeping {:?}: {}",
                        action.count,
                        action.delay,
                        e
                    ),
                    BackoffTier::VeryLong => tracing::error!(
                        "Very long term failure {}, sleeping {:?}: {}",
                        action.count,
                        action.delay,
                        e
                    ),
                }

                self.sleeper.sleep(action.delay).await;
                StepOutcome::BackedOff(action)
            }
        }
    }

    async fn handle_killmail(&self, raw: Value) -> StepOutcome {
        let killmail: Killmail = match serde_json::from_value(raw) {
            Ok(killmail) => killmail,
            Err(e) => {
                tracing::warn!("Dropping malformed killmail from RedisQ: {}", e);
                return StepOutcome::Dropped;
            }
        };
        let killmail_id = killmail.killmail_id;

        self.cache(&killmail).await;

        let names = NameService::new(self.db, self.esi_client)
            .resolve(&killmail.name_ids())
            .await;

        let message = BusMessage { killmail, names };
        if let Err(e) = self.publish(&message).await {
            tracing::error!("When broadcasting {} got error: {}", killmail_id, e);
            return StepOutcome::PublishFailed(killmail_id);
        }

        tracing::info!("Broadcasting {}", killmail_id);
        StepOutcome::Published(killmail_id)
    }

    async fn cache(&self, killmail: &Killmail) {
        let raw = match serde_json::to_string(killmail) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to serialize killmail {}: {}", killmail.killmail_id, e);
                return;
            }
        };

        match KillmailRepository::new(self.db)
            .insert(killmail.killmail_id, &raw)
            .await
        {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Killmail {} already cached", killmail.killmail_id),
            Err(e) => tracing::error!(
                "Failed to cache killmail {}: {}",
                killmail.killmail_id,
                e
            ),
        }
    }

    async fn publish(&self, message: &BusMessage) -> Result<(), Error> {
        let line = message.encode(self.bus.topic())?;
        self.bus.publish(&line).await
    }

    /// Run until `shutdown` resolves
    ///
    /// Shutdown is checked between steps and while a step is in flight, an
    /// interrupted step is abandoned.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!("RedisQ listener running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = self.step() => {}
            }
        }

        tracing::info!("RedisQ listener stopped");
    }

    /// Run until the process is terminated
    pub async fn run(&mut self) {
        self.run_until(std::future::pending()).await
    }
}
