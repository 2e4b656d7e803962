use dioxus_logger::tracing::{self, Level};
use killwatch::{
    alert::{
        notifier::{DiscordWebhook, Notifier},
        AlertBot, ONLINE_ANNOUNCEMENT,
    },
    config::AlertConfig,
    startup,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match AlertConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    dioxus_logger::init(Level::INFO).expect("Failed to initialize logger");

    let user_agent = format!("killwatch/{}", env!("CARGO_PKG_VERSION"));
    let notifier = DiscordWebhook::new(&config.discord_webhook_url, &user_agent).unwrap();
    let sde = startup::connect_to_static_data(&config).await.unwrap();
    let mut subscription = startup::subscribe_to_bus(&config).await.unwrap();

    let bot = AlertBot::load(&sde, config.filter.clone(), notifier, &config.bus_topic)
        .await
        .unwrap();

    if let Err(e) = bot.notifier().send(ONLINE_ANNOUNCEMENT).await {
        tracing::warn!("Failed to announce startup: {}", e);
    }
    tracing::info!("Alert bot online");

    bot.run_until(&mut subscription, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;
}
