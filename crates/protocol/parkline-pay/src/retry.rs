//! Backoff for idempotent provider reads.
//!
//! Only session retrieval goes through [`RetryPolicy`]. The wait before
//! the next attempt depends on how the provider failed:
//!
//! | Error                             | Wait                                      |
//! |-----------------------------------|-------------------------------------------|
//! | `RateLimited` with `Retry-After`  | the requested wait, capped at `max_delay` |
//! | `RateLimited`                     | one backoff step further than an outage   |
//! | `Unavailable`, `Network`, `Timeout` | exponential backoff with jitter         |
//! | anything else                     | no retry                                  |

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryConfig;
use crate::error::{PayError, PayResult};

/// Backoff schedule for provider reads.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy making at most `max_attempts` calls in total.
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Create from retry config.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay, config.max_delay)
    }

    /// Maximum number of calls, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before retrying after `error` on the given failed call
    /// (1-indexed), or `None` when the call must not be repeated.
    pub fn backoff(&self, failed_attempt: u32, error: &PayError) -> Option<Duration> {
        if failed_attempt >= self.max_attempts || !error.is_retryable() {
            return None;
        }

        let wait = match error {
            PayError::RateLimited {
                retry_after: Some(requested),
                ..
            } => (*requested).min(self.max_delay),
            PayError::RateLimited { .. } => self.jittered(failed_attempt + 1),
            _ => self.jittered(failed_attempt),
        };
        Some(wait)
    }

    /// `base_delay * 2^(step-1)`, capped at `max_delay`, within +-25%.
    fn jittered(&self, step: u32) -> Duration {
        let exponent = step.saturating_sub(1).min(16);
        let capped = self
            .base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay);

        let capped_ms = capped.as_millis() as u64;
        let spread = capped_ms / 4;
        if spread == 0 {
            return capped;
        }
        let offset = rand::random::<u64>() % (spread * 2 + 1);
        Duration::from_millis(capped_ms - spread + offset)
    }

    /// Run `operation` until it succeeds, fails permanently, or the
    /// attempts run out. The last error is returned as-is.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> PayResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PayResult<T>>,
    {
        let mut attempt = 1;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            let Some(wait) = self.backoff(attempt, &error) else {
                if attempt > 1 {
                    debug!(attempts = attempt, error = %error, "Giving up on provider read");
                }
                return Err(error);
            };

            warn!(
                attempt,
                max_attempts = self.max_attempts,
                wait_ms = wait.as_millis() as u64,
                error = %error,
                "Provider read failed, retrying"
            );
            sleep(wait).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
