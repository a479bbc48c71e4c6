//! Bounded exponential backoff for rate-limited service calls.
//!
//! Retry applies only to [`ReelError::RateLimited`]; every other failure is
//! assumed deterministic and propagates immediately. An exhausted budget
//! surfaces the last rate-limit error unchanged.

use std::time::Duration;

use tracing::warn;

use crate::foundation::error::{ReelError, ReelResult};

/// Retry policy for one class of service call.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Total attempts, the first call included. Must be at least 1.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Cap applied to the exponential delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

/// Delay before retry number `attempt` (zero-based): `base * 2^attempt`,
/// capped at `max_delay_ms`.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exp = config
        .base_delay_ms
        .saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(exp.min(config.max_delay_ms))
}

/// Run `op` with bounded backoff on rate-limit errors.
///
/// `operation` names the call in logs. Blocks the calling thread between
/// attempts.
pub fn with_backoff<T>(
    config: &RetryConfig,
    operation: &str,
    mut op: impl FnMut() -> ReelResult<T>,
) -> ReelResult<T> {
    let attempts = config.max_attempts.max(1);
    let mut last_err: Option<ReelError> = None;

    for attempt in 0..attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < attempts => {
                let delay = backoff_delay(config, attempt);
                warn!(
                    operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    %err,
                    "service call rate limited, retrying"
                );
                std::thread::sleep(delay);
                last_err = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    // Unreachable with attempts >= 1; the loop always returns.
    Err(last_err.unwrap_or_else(|| ReelError::service("retry budget exhausted")))
}

#[cfg(test)]
#[path = "../../tests/unit/service/retry.rs"]
mod tests;
