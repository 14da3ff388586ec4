//! Bounded retry with exponential backoff.
//!
//! Retry is an explicit attempt-counter loop over a transiency
//! classification, so the boundary's contract is testable without a real
//! remote service. No jitter is added: caller concurrency is low and the
//! per-request backoff curve stays predictable.

use std::future::Future;
use std::time::Duration;

/// Classification of an error as worth a backoff-and-retry.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Retry budget for one logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `operation`, retrying transient failures with exponential backoff.
///
/// The sleep before the retry following attempt `n` (0-based) is
/// `base_delay * 2^n`. Non-transient failures propagate immediately; once
/// the budget is exhausted the last failure propagates unchanged, so the
/// caller sees the underlying cause.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt + 1 < max_attempts => {
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient failure; backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
