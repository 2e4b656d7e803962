//! Listener to alert bot over the in-process bus.
//!
//! One in-memory database holds both the killmail cache and the static data, and
//! one mock server stands in for ESI and RedisQ.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::Utc;
use killwatch::{
    alert::{notifier::Notifier, AlertBot, AlertOutcome, DropReason},
    bus::{local::LocalBus, Subscription},
    config::AlertFilterConfig,
    data::killmail::KillmailRepository,
    error::Error,
    listener::{feed::RedisqClient, sleep::Sleeper, Listener, StepOutcome},
};
use killwatch_test_utils::prelude::*;

const VENAL: i64 = 10000015;
const THE_FORGE: i64 = 10000002;

const HOME: i64 = 30001000;
const GATE: i64 = 30001001;
const TARGET: i64 = 30001002;
const JITA: i64 = 30000142;

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, content: &str) -> Result<(), Error> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

struct NoSleep;

impl Sleeper for NoSleep {
    async fn sleep(&self, _duration: Duration) {}
}

/// Database, ESI and RedisQ serving one killmail from character 1 killed by corporation 2
async fn setup(killmail: serde_json::Value) -> Result<TestContext, TestError> {
    TestBuilder::new()
        .with_cache_tables()
        .with_universe_tables()
        .with_region(VENAL, "Venal")
        .with_region(THE_FORGE, "The Forge")
        .with_system(HOME, VENAL, "Home")
        .with_system(GATE, VENAL, "Gate")
        .with_system(TARGET, VENAL, "Target")
        .with_system(JITA, THE_FORGE, "Jita")
        .with_type(587, "Rifter")
        .with_jump(HOME, GATE)
        .with_jump(GATE, TARGET)
        .with_redisq_endpoint(factory::redisq_package(killmail), 1)
        .with_character_endpoint(1, "Pilot", 1)
        .with_corporation_endpoint(2, "Corp", 1)
        .build()
        .await
}

fn filter() -> AlertFilterConfig {
    AlertFilterConfig {
        home_system_id: HOME,
        watch_regions: HashSet::from([VENAL]),
        max_killmail_age: chrono::Duration::minutes(45),
    }
}

/// Run the listener for one poll and hand whatever it published to the alert bot
async fn relay(test: &TestContext, notifier: RecordingNotifier) -> (StepOutcome, AlertOutcome) {
    let feed = RedisqClient::new(&test.feed_url(), TEST_REDISQ_QUEUE_ID, TEST_USER_AGENT).unwrap();
    let bus = LocalBus::new("zkb", 16);
    let mut subscription = bus.subscribe();

    let step = Listener::new(&feed, &test.db, &test.esi_client, &bus, NoSleep)
        .step()
        .await;
    let line = subscription.recv().await.expect("listener published nothing");

    let bot = AlertBot::load(&test.db, filter(), notifier, "zkb").await.unwrap();
    let alert = bot.handle(&line, Utc::now()).await;

    (step, alert)
}

/// Tests a fresh killmail in a watched region end to end.
///
/// Expected: one alert naming the victim and the attacking corporation
#[tokio::test]
async fn fresh_killmail_reaches_notifier() -> Result<(), TestError> {
    let test = setup(factory::mock_killmail(100, TARGET, Utc::now())).await?;
    let notifier = RecordingNotifier::default();

    let (step, alert) = relay(&test, notifier.clone()).await;

    assert_eq!(step, StepOutcome::Published(100));
    let AlertOutcome::Sent(text) = alert else {
        panic!("expected an alert, got {:?}", alert);
    };
    assert!(text.contains("Pilot"));
    assert!(text.contains("Corporations: Corp"));
    assert!(text.contains("Attackers: 1"));
    assert!(text.contains("/ Venal / Target / 2 jumps]"));
    assert_eq!(notifier.sent(), vec![text]);
    test.assert_mocks();

    Ok(())
}

/// Tests a killmail older than the freshness window.
///
/// Expected: published by the listener, never handed to the notifier
#[tokio::test]
async fn stale_killmail_never_reaches_notifier() -> Result<(), TestError> {
    let killmail_time = Utc::now() - chrono::Duration::minutes(50);
    let test = setup(factory::mock_killmail(100, TARGET, killmail_time)).await?;
    let notifier = RecordingNotifier::default();

    let (step, alert) = relay(&test, notifier.clone()).await;

    assert_eq!(step, StepOutcome::Published(100));
    assert_eq!(alert, AlertOutcome::Dropped(DropReason::TooOld));
    assert!(notifier.sent().is_empty());

    Ok(())
}

/// Tests a killmail outside the watched regions.
///
/// Expected: cached and published by the listener, dropped by the alert bot
#[tokio::test]
async fn unwatched_killmail_is_cached_but_not_alerted() -> Result<(), TestError> {
    let test = setup(factory::mock_killmail(100, JITA, Utc::now())).await?;
    let notifier = RecordingNotifier::default();

    let (step, alert) = relay(&test, notifier.clone()).await;

    assert_eq!(step, StepOutcome::Published(100));
    assert_eq!(alert, AlertOutcome::Dropped(DropReason::RegionNotWatched));
    assert!(notifier.sent().is_empty());
    assert!(KillmailRepository::new(&test.db).get(100).await?.is_some());

    Ok(())
}
