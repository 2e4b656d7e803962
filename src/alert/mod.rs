//! Alert bot, the consumer side of killwatch.
//!
//! Reads wire lines from the bus and forwards killmails in watched regions to a
//! [`Notifier`] as one line of text. Every failure is local to the message being
//! handled, the loop only stops on shutdown or when the bus closes.

pub mod format;
pub mod notifier;

use std::future::Future;

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use sea_orm::{DatabaseConnection, DbErr};

use crate::{
    bus::Subscription,
    config::AlertFilterConfig,
    data::universe::UniverseRepository,
    model::message::BusMessage,
    service::route::RegionGraph,
};

use self::{
    format::{format_alert, AlertContext},
    notifier::Notifier,
};

/// Sent once when the alert bot starts
pub const ONLINE_ANNOUNCEMENT: &str = "Now Online";

/// Why a bus message did not produce an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not a decodable message for this topic
    Malformed,
    /// Killmail is outside the watched regions or in an unknown system
    RegionNotWatched,
    /// Killmail is older than the freshness window
    TooOld,
    /// Static data could not be read
    Lookup,
    /// The notifier rejected the alert
    NotifyFailed,
}

/// Result of [`AlertBot::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Sent(String),
    Dropped(DropReason),
}

pub struct AlertBot<'a, N> {
    sde: &'a DatabaseConnection,
    graph: RegionGraph,
    filter: AlertFilterConfig,
    notifier: N,
    topic: String,
}

impl<'a, N> AlertBot<'a, N>
where
    N: Notifier,
{
    pub fn new(
        sde: &'a DatabaseConnection,
        graph: RegionGraph,
        filter: AlertFilterConfig,
        notifier: N,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            sde,
            graph,
            filter,
            notifier,
            topic: topic.into(),
        }
    }

    /// Create an alert bot routing over the jump graph stored in the static data
    pub async fn load(
        sde: &'a DatabaseConnection,
        filter: AlertFilterConfig,
        notifier: N,
        topic: impl Into<String>,
    ) -> Result<Self, DbErr> {
        let graph = UniverseRepository::new(sde).load_jump_graph().await?;

        Ok(Self::new(sde, graph, filter, notifier, topic))
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Filter, format and forward one wire line
    ///
    /// `now` is the receipt time the freshness window is measured against.
    pub async fn handle(&self, line: &str, now: DateTime<Utc>) -> AlertOutcome {
        let message = match BusMessage::decode(line, &self.topic) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Dropping bus message: {}", e);
                return AlertOutcome::Dropped(DropReason::Malformed);
            }
        };
        let killmail = &message.killmail;
        let universe_repo = UniverseRepository::new(self.sde);

        let region_id = match universe_repo.system_region(killmail.solar_system_id).await {
            Ok(Some(region_id)) if self.filter.watch_regions.contains(&region_id) => region_id,
            Ok(_) => {
                tracing::debug!(
                    "Killmail {} in system {} is outside the watched regions",
                    killmail.killmail_id,
                    killmail.solar_system_id
                );
                return AlertOutcome::Dropped(DropReason::RegionNotWatched);
            }
            Err(e) => {
                tracing::error!(
                    "Failed to look up region of killmail {}: {}",
                    killmail.killmail_id,
                    e
                );
                return AlertOutcome::Dropped(DropReason::Lookup);
            }
        };

        let oldest = now - self.filter.max_killmail_age;
        if killmail.killmail_time < oldest {
            tracing::debug!(
                "Killmail {} too old {} < {}",
                killmail.killmail_id,
                killmail.killmail_time,
                oldest
            );
            return AlertOutcome::Dropped(DropReason::TooOld);
        }

        let jumps = self.jumps_from_home(killmail.solar_system_id);

        let lookups = async {
            Ok::<_, DbErr>((
                universe_repo.region_name(region_id).await?,
                universe_repo.system_name(killmail.solar_system_id).await?,
                universe_repo.type_name(killmail.victim.ship_type_id).await?,
            ))
        };
        let (region_name, system_name, ship_name) = match lookups.await {
            Ok(names) => names,
            Err(e) => {
                tracing::error!(
                    "Failed to look up static data for killmail {}: {}",
                    killmail.killmail_id,
                    e
                );
                return AlertOutcome::Dropped(DropReason::Lookup);
            }
        };

        let text = format_alert(
            killmail,
            &message.names,
            &AlertContext {
                region_name: &region_name,
                system_name: &system_name,
                ship_name: &ship_name,
                jumps,
            },
        );

        if let Err(e) = self.notifier.send(&text).await {
            tracing::error!("Failed to send alert for killmail {}: {}", killmail.killmail_id, e);
            return AlertOutcome::Dropped(DropReason::NotifyFailed);
        }

        tracing::info!("{}", text);
        AlertOutcome::Sent(text)
    }

    /// Jumps from the home system, -1 when no route is known
    fn jumps_from_home(&self, solar_system_id: i64) -> i64 {
        let home_system_id = self.filter.home_system_id;
        if home_system_id == solar_system_id {
            return 0;
        }

        match self.graph.find_shortest_path(home_system_id, solar_system_id) {
            Ok(route) if route.is_empty() => {
                tracing::warn!("No route between {} and {}", home_system_id, solar_system_id);
                -1
            }
            Ok(route) => route.len() as i64,
            Err(e) => {
                tracing::error!("{}", e);
                -1
            }
        }
    }

    /// Handle bus messages until `shutdown` resolves or the bus closes
    pub async fn run_until<S, F>(&self, subscription: &mut S, shutdown: F)
    where
        S: Subscription,
        F: Future<Output = ()>,
    {
        tracing::info!("Alert bot listening on {}", self.topic);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                line = subscription.recv() => match line {
                    Some(line) => {
                        self.handle(&line, Utc::now()).await;
                    }
                    None => {
                        tracing::warn!("Bus closed");
                        break;
                    }
                },
            }
        }

        tracing::info!("Alert bot stopped");
    }
}
