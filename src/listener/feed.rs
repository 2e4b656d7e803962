//! zKillboard RedisQ long-poll client.
//!
//! `GET {base}/listen.php?queueID={queue}` blocks server-side for a few seconds
//! and answers `{"package": {...}}` with one killmail or `{"package": null}` when
//! nothing happened in that window. The queue ID identifies this listener, RedisQ
//! remembers which killmails each queue has already been served.

use std::time::Duration;

use serde_json::Value;

use crate::error::{feed::FeedError, Error};

/// Client-side limit for one long-poll
pub const POLL_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RedisqClient {
    http: reqwest::Client,
    listen_url: String,
    queue_id: String,
}

impl RedisqClient {
    pub fn new(base_url: &str, queue_id: &str, user_agent: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(POLL_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            listen_url: format!("{}/listen.php", base_url.trim_end_matches('/')),
            queue_id: queue_id.to_string(),
        })
    }

    /// Wait for the next killmail
    ///
    /// # Returns
    /// - `Ok(Some(killmail))` - Killmail JSON with the zKillboard hash copied into `hash`
    /// - `Ok(None)` - No killmail this poll window
    /// - `Err(FeedError)` - Timeout, transport failure, non-200 status or a non-JSON body
    pub async fn poll(&self) -> Result<Option<Value>, FeedError> {
        let url = format!("{}?queueID={}", self.listen_url, self.queue_id);

        let response = self
            .http
            .get(&self.listen_url)
            .query(&[("queueID", self.queue_id.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let body: Value = serde_json::from_str(&body).map_err(|e| FeedError::Body {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(extract_killmail(body))
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> FeedError {
    if error.is_timeout() {
        FeedError::Timeout {
            url: url.to_string(),
        }
    } else {
        FeedError::Transport {
            url: url.to_string(),
            error,
        }
    }
}

/// Pull the killmail out of a RedisQ body, copying `package.zkb.hash` into it.
///
/// Anything short of a package with both a killmail object and a hash counts as
/// an empty poll window.
pub fn extract_killmail(body: Value) -> Option<Value> {
    let Value::Object(mut body) = body else {
        return None;
    };
    let Value::Object(mut package) = body.remove("package")? else {
        return None;
    };

    let hash = package.get("zkb")?.get("hash")?.clone();
    let mut killmail = package.remove("killmail")?;
    killmail.as_object_mut()?.insert("hash".to_string(), hash);

    Some(killmail)
}
