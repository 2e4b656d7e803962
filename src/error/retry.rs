use sea_orm::DbErr;

use super::Error;

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (server errors)
    Retry,
    /// Failed permanently (bad request)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Error::EsiError(eve_esi::Error::ReqwestError(reqwest_error)) => {
                if let Some(status) = reqwest_error.status() {
                    match status {
                        // ESI is temporarily unavailable, backoff and retry later
                        s if s.is_server_error() => ErrorRetryStrategy::Retry,

                        // 404 for a deleted character or a request we should never
                        // have made, retrying will not change the answer
                        s if s.is_client_error() => ErrorRetryStrategy::Fail,

                        _ => ErrorRetryStrategy::Fail,
                    }
                } else {
                    // Network error or connection issue
                    ErrorRetryStrategy::Retry
                }
            }
            Self::EsiError(_) => ErrorRetryStrategy::Fail,

            Self::DbErr(db_err) => match db_err {
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,
                _ => ErrorRetryStrategy::Fail,
            },

            // The feed has its own tiered backoff in the listener
            Self::FeedError(_) => ErrorRetryStrategy::Retry,

            Self::RedisError(_) => ErrorRetryStrategy::Retry,
            Self::ReqwestError(e) => match e.status() {
                Some(status) if status.is_client_error() => ErrorRetryStrategy::Fail,
                _ => ErrorRetryStrategy::Retry,
            },

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::RouteError(_) => ErrorRetryStrategy::Fail,
            Self::MalformedPayload(_) => ErrorRetryStrategy::Fail,
            Self::JsonError(_) => ErrorRetryStrategy::Fail,

            // The bus and notifier are fire-and-forget
            Self::BusError(_) => ErrorRetryStrategy::Fail,
            Self::NotifyError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
