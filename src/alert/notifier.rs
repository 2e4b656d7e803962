use std::time::Duration;

use serde::Serialize;

use crate::error::Error;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound channel for alert text.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn send(&self, content: &str) -> Result<(), Error>;
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts alerts to a Discord channel webhook.
pub struct DiscordWebhook {
    http: reqwest::Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(WEBHOOK_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

impl Notifier for DiscordWebhook {
    async fn send(&self, content: &str) -> Result<(), Error> {
        let response = self
            .http
            .post(&self.url)
            .json(&WebhookMessage { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::NotifyError(format!(
                "webhook responded with {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
