use fred::{
    clients::{Pool, SubscriberClient},
    types::config::ReconnectPolicy,
};
use sea_orm::DatabaseConnection;

use crate::{
    bus::redis::{RedisBus, RedisSubscription},
    config::{AlertConfig, ListenerConfig},
    error::Error,
};

/// Build the ESI client used for name resolution
pub fn build_esi_client(config: &ListenerConfig) -> Result<eve_esi::Client, Error> {
    let esi_client = eve_esi::Client::builder()
        .user_agent(&config.user_agent())
        .build()?;

    Ok(esi_client)
}

/// Connect to the killmail and name cache database and run migrations
pub async fn connect_to_database(config: &ListenerConfig) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Connect to the static data export, which is only ever read
pub async fn connect_to_static_data(config: &AlertConfig) -> Result<DatabaseConnection, Error> {
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.sde_database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Ok(db)
}

/// Reconnect forever, backing off from 100ms up to 30s between attempts
pub fn bus_reconnect_policy() -> ReconnectPolicy {
    ReconnectPolicy::new_exponential(0, 100, 30_000, 2)
}

/// Build the publisher pool without connecting it
pub fn bus_pool(valkey_url: &str) -> Result<Pool, Error> {
    use fred::prelude::*;

    let redis_config = Config::from_url(valkey_url)?;
    let pool = Pool::new(redis_config, None, None, Some(bus_reconnect_policy()), 6)?;

    Ok(pool)
}

/// Build the subscriber client without connecting it
pub fn bus_subscriber_client(valkey_url: &str) -> Result<SubscriberClient, Error> {
    use fred::prelude::*;

    let redis_config = Config::from_url(valkey_url)?;
    let mut builder = Builder::from_config(redis_config);
    builder.set_policy(bus_reconnect_policy());

    Ok(builder.build_subscriber_client()?)
}

/// Connect to Valkey/Redis for publishing on the bus
pub async fn connect_to_bus(config: &ListenerConfig) -> Result<RedisBus, Error> {
    use fred::prelude::*;

    let pool = bus_pool(&config.valkey_url)?;

    pool.connect();
    pool.wait_for_connect().await?;

    Ok(RedisBus::new(pool, &config.bus_topic))
}

/// Connect to Valkey/Redis and subscribe to the bus topic
pub async fn subscribe_to_bus(config: &AlertConfig) -> Result<RedisSubscription, Error> {
    use fred::prelude::*;

    let client = bus_subscriber_client(&config.valkey_url)?;

    client.init().await?;
    // Re-subscribe automatically after a reconnect
    let _ = client.manage_subscriptions();

    RedisSubscription::subscribe(client, &config.bus_topic).await
}
