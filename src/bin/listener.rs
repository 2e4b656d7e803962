use dioxus_logger::tracing::{self, Level};
use killwatch::{
    config::ListenerConfig,
    listener::{feed::RedisqClient, sleep::TokioSleeper, Listener},
    startup,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match ListenerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    dioxus_logger::init(Level::INFO).expect("Failed to initialize logger");

    let esi_client = startup::build_esi_client(&config).unwrap();
    let db = startup::connect_to_database(&config).await.unwrap();
    let bus = startup::connect_to_bus(&config).await.unwrap();
    let feed = RedisqClient::new(
        &config.redisq_url,
        &config.redisq_queue_id,
        &config.user_agent(),
    )
    .unwrap();

    tracing::info!(
        "Listening to RedisQ queue {}, publishing on {}",
        config.redisq_queue_id,
        config.bus_topic
    );

    Listener::new(&feed, &db, &esi_client, &bus, TokioSleeper)
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
}
