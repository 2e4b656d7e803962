//! Environment configuration for the listener and alert binaries.
//!
//! Both binaries call `dotenvy::dotenv().ok()` first and then build their config from
//! the process environment. Parsing is written against a lookup function so tests can
//! supply variables without touching the real environment.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::Duration;

use crate::error::config::ConfigError;

pub const DEFAULT_REDISQ_URL: &str = "https://redisq.zkillboard.com";
pub const DEFAULT_REDISQ_QUEUE_ID: &str = "KM52APP84";
pub const DEFAULT_BUS_TOPIC: &str = "zkb";

/// 1DQ1-A, Delve
pub const DEFAULT_HOME_SYSTEM_ID: i64 = 30001329;
pub const DEFAULT_MAX_KILLMAIL_AGE_MINUTES: i64 = 45;

pub const DEFAULT_WATCH_REGIONS: [i64; 11] = [
    10000015, // Venal
    10000035, // Deklein
    10000055, // Branch
    10000045, // Tenal
    10000066, // Perrigen Falls
    10000010, // Tribute
    10000040, // Oasa
    10000053, // Cobalt Edge
    10000046, // Fade
    10000023, // Pure Blind
    10000013, // Malpais
];

/// Configuration for the RedisQ listener (producer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub contact_email: String,
    pub database_url: String,
    pub valkey_url: String,
    pub redisq_url: String,
    pub redisq_queue_id: String,
    pub bus_topic: String,
}

/// Configuration for the alert bot (consumer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertConfig {
    pub valkey_url: String,
    pub bus_topic: String,
    pub sde_database_url: String,
    pub discord_webhook_url: String,
    pub filter: AlertFilterConfig,
}

/// Which killmails the alert bot forwards and where jumps are counted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFilterConfig {
    pub home_system_id: i64,
    pub watch_regions: HashSet<i64>,
    pub max_killmail_age: Duration,
}

impl Default for AlertFilterConfig {
    fn default() -> Self {
        Self {
            home_system_id: DEFAULT_HOME_SYSTEM_ID,
            watch_regions: DEFAULT_WATCH_REGIONS.into_iter().collect(),
            max_killmail_age: Duration::minutes(DEFAULT_MAX_KILLMAIL_AGE_MINUTES),
        }
    }
}

impl ListenerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            contact_email: required(&lookup, "CONTACT_EMAIL")?,
            database_url: required(&lookup, "DATABASE_URL")?,
            valkey_url: required(&lookup, "VALKEY_URL")?,
            redisq_url: lookup("REDISQ_URL").unwrap_or_else(|| DEFAULT_REDISQ_URL.to_string()),
            redisq_queue_id: lookup("REDISQ_QUEUE_ID")
                .unwrap_or_else(|| DEFAULT_REDISQ_QUEUE_ID.to_string()),
            bus_topic: bus_topic(&lookup)?,
        })
    }

    /// User agent sent to ESI and RedisQ, CCP asks for a way to contact the operator
    pub fn user_agent(&self) -> String {
        format!(
            "killwatch/{} ({})",
            env!("CARGO_PKG_VERSION"),
            self.contact_email
        )
    }
}

impl AlertConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_regions = match lookup("WATCH_REGIONS") {
            Some(value) => parse_id_list("WATCH_REGIONS", &value)?,
            None => DEFAULT_WATCH_REGIONS.into_iter().collect(),
        };
        let max_age_minutes: i64 = parsed(
            &lookup,
            "MAX_KILLMAIL_AGE_MINUTES",
            DEFAULT_MAX_KILLMAIL_AGE_MINUTES,
        )?;
        if max_age_minutes <= 0 {
            return Err(ConfigError::InvalidEnvValue {
                var: "MAX_KILLMAIL_AGE_MINUTES".to_string(),
                reason: "must be a positive number of minutes".to_string(),
            });
        }

        Ok(Self {
            valkey_url: required(&lookup, "VALKEY_URL")?,
            bus_topic: bus_topic(&lookup)?,
            sde_database_url: required(&lookup, "SDE_DATABASE_URL")?,
            discord_webhook_url: required(&lookup, "DISCORD_WEBHOOK_URL")?,
            filter: AlertFilterConfig {
                home_system_id: parsed(&lookup, "HOME_SYSTEM_ID", DEFAULT_HOME_SYSTEM_ID)?,
                watch_regions,
                max_killmail_age: Duration::minutes(max_age_minutes),
            },
        })
    }
}

fn required<F>(lookup: &F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

fn parsed<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}

// The wire format separates topic and body with the first space
fn bus_topic<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let topic = lookup("BUS_TOPIC").unwrap_or_else(|| DEFAULT_BUS_TOPIC.to_string());
    if topic.is_empty() || topic.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvValue {
            var: "BUS_TOPIC".to_string(),
            reason: "must be non-empty and contain no whitespace".to_string(),
        });
    }

    Ok(topic)
}

fn parse_id_list(var: &str, value: &str) -> Result<HashSet<i64>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>()
                .map_err(|e| ConfigError::InvalidEnvValue {
                    var: var.to_string(),
                    reason: format!("{:?} is not an ID: {}", id, e),
                })
        })
        .collect()
}
