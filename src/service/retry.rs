use std::{future::Future, time::Duration};

use dioxus_logger::tracing;

use crate::error::{retry::ErrorRetryStrategy, Error};

/// Retry policy for ESI requests and other operations that fail transiently
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Initial backoff between attempts, doubled after every failure
    initial_backoff_secs: u64,
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff_secs: Self::DEFAULT_INITIAL_BACKOFF_SECS,
        }
    }

    /// Execute an operation, retrying errors classified as retryable
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "character 2114794365 name")
    /// - `operation`: Async function performing a single attempt
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::debug!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::warn!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff_secs = self.initial_backoff_secs * 2_u64.pow(attempt_count - 1);
                        let backoff = Duration::from_secs(backoff_secs);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    fn connection_error() -> Error {
        Error::DbErr(sea_orm::DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "connection reset".to_string(),
        )))
    }

    /// Retryable errors are attempted three times with 1s then 2s between attempts
    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_with_backoff() {
        let attempts = &AtomicU32::new(0);
        let started = Instant::now();

        let result: Result<(), Error> = RetryContext::new()
            .execute_with_retry("flaky operation", || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(connection_error())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(4), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_success() {
        let attempts = &AtomicU32::new(0);

        let result = RetryContext::new()
            .execute_with_retry("recovering operation", || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(connection_error())
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_are_not_retried() {
        let attempts = &AtomicU32::new(0);

        let result: Result<(), Error> = RetryContext::new()
            .execute_with_retry("bad payload", || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(Error::MalformedPayload("missing victim".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::MalformedPayload(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
