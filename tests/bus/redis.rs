//! Bus round trip through a real Valkey/Redis server.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use fred::{prelude::*, types::Builder};
use killwatch::{
    bus::{
        redis::{RedisBus, RedisSubscription},
        Broadcaster, Subscription,
    },
    model::{killmail::Killmail, message::BusMessage, names::ActorNames},
};
use killwatch_test_utils::prelude::*;

const REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Unique per test run so parallel runs never see each other's messages
fn unique_topic() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    format!("zkb-test-{}", timestamp)
}

#[tokio::test]
async fn published_line_reaches_subscriber() {
    let topic = unique_topic();

    let pool = Pool::new(Config::from_url(REDIS_URL).unwrap(), None, None, None, 2).unwrap();
    pool.init().await.expect("Failed to connect publisher");
    let bus = RedisBus::new(pool, &topic);

    let client = Builder::from_config(Config::from_url(REDIS_URL).unwrap())
        .build_subscriber_client()
        .unwrap();
    client.init().await.expect("Failed to connect subscriber");
    let mut subscription = RedisSubscription::subscribe(client, &topic)
        .await
        .expect("Failed to subscribe");

    let killmail: Killmail =
        serde_json::from_value(factory::mock_killmail(100, 30001000, Utc::now())).unwrap();
    let mut names = ActorNames::new();
    names.character_ids.insert(1, "Pilot".to_string());
    let message = BusMessage { killmail, names };

    bus.publish(&message.encode(bus.topic()).unwrap())
        .await
        .expect("Failed to publish");

    let line = tokio::time::timeout(std::time::Duration::from_secs(5), subscription.recv())
        .await
        .expect("Timed out waiting for the message")
        .expect("Subscription closed");

    assert_eq!(BusMessage::decode(&line, &topic).unwrap(), message);
}
