//! Bounded retry with exponential backoff
//!
//! Every external call site (diff fetch, analyzer request, review publish)
//! gets its own `RetryPolicy` run; budgets are per call, not shared. The
//! caller supplies a predicate deciding which errors are worth retrying;
//! everything else propagates immediately.

use std::future::Future;
use std::time::Duration;

use crate::app_config::RetryConfig;

/// Retry parameters for a single external call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        )
    }

    /// Delay before the retry following attempt `attempt` (0-based),
    /// doubling each time.
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Run `op`, retrying while `is_retryable` holds and attempts remain.
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut last_err: Option<E> = None;

        for attempt in 0..self.max_attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !is_retryable(&err) {
                        return Err(err);
                    }

                    if attempt + 1 < self.max_attempts {
                        let delay = self.delay_for(attempt);
                        log::warn!(
                            "Attempt {}/{} failed: {}. Retrying in {:.1}s",
                            attempt + 1,
                            self.max_attempts,
                            err,
                            delay.as_secs_f64(),
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.expect("at least one attempt was made"))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
