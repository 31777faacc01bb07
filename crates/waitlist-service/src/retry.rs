//! Retry executor for transient storage failures.
//!
//! # Policy
//!
//! - Delay before retry `n` (0-based): `min(base * multiplier^n, max_delay)`
//! - Jitter: uniform in ±25% of that delay
//! - Only [`AppError::is_transient`] errors are retried; everything else is
//!   returned on the spot, without sleeping
//! - After `max_retries` retries the last error is returned as-is

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use waitlist_core::config::RetryConfig;
use waitlist_core::error::AppError;

/// Backoff parameters for [`with_retry`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound for a single delay before jitter.
    pub max_delay: Duration,
    /// Growth factor applied per attempt.
    pub multiplier: f64,
    /// Symmetric jitter as a fraction of the delay.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Build a policy from configuration.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            multiplier: config.backoff_multiplier.max(1.0),
            jitter_factor: 0.25,
        }
    }

    /// Un-jittered delay before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::from_secs_f64(raw.min(self.max_delay.as_secs_f64()))
    }

    /// Jittered delay before retry number `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let capped = self.backoff(attempt).as_secs_f64();
        let jitter = capped * self.jitter_factor * (rand::random::<f64>() * 2.0 - 1.0);
        Duration::from_secs_f64((capped + jitter).max(0.0))
    }

    /// Worst-case latency the executor can add across all retries.
    pub fn max_total_delay(&self) -> Duration {
        (0..self.max_retries)
            .map(|attempt| self.backoff(attempt).mul_f64(1.0 + self.jitter_factor))
            .sum()
    }
}

/// Run `operation`, retrying transient failures according to `policy`.
///
/// `operation` is invoked once per attempt and must be safe to repeat;
/// the allocation transaction qualifies because a failed attempt commits
/// nothing.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(
                        operation = operation_name,
                        retries = attempt,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    operation = operation_name,
                    retry = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient storage failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    warn!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        error = %err,
                        "Retry budget exhausted"
                    );
                }
                return Err(err);
            }
        }
    }
}
