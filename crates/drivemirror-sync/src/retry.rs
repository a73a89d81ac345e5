//! Transient-fault retry wrapper
//!
//! Every remote call made by the engine goes through [`RetryPolicy::execute`].
//! Only [`RemoteError::Transient`] (HTTP 429, 503, 504) is retried; anything
//! else is returned to the caller on the first occurrence.
//!
//! Backoff is linear: the server's `Retry-After` hint when present, otherwise
//! `base_delay × attempt` (10 s, 20 s, 30 s, ... by default).

use std::future::Future;
use std::time::Duration;

use drivemirror_core::config::RetryConfig;
use drivemirror_core::ports::RemoteError;
use tracing::{info, warn};

/// Default attempt ceiling, including the first call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default linear backoff step
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(10);

/// Retry configuration for remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_secs(config.base_delay_secs))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before the attempt following `attempt` (1-based)
    pub fn backoff(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        hint.unwrap_or(self.base_delay * attempt)
    }

    /// Runs `op` until it succeeds, fails permanently, or the attempt
    /// ceiling is reached
    ///
    /// On exhaustion the last transient error is returned unchanged.
    pub async fn execute<F, Fut, T>(&self, operation: &str, mut op: F) -> Result<T, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let wait = self.backoff(attempt, err.retry_after());
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_secs = wait.as_secs_f64(),
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        warn!(operation, attempts = attempt, error = %err, "Retry limit exhausted");
                    }
                    return Err(err);
                }
            }
        }
    }
}
