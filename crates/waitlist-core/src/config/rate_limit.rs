//! Per-client request throttling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A single sliding-window budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Requests allowed inside one window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_seconds: u64,
}

impl RateLimitPolicy {
    /// Window length as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

/// Rate limiting for the two endpoint classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Budget for the mutating signup endpoint.
    #[serde(default = "default_signup_policy")]
    pub signup: RateLimitPolicy,
    /// Budget for read-only status queries.
    #[serde(default = "default_status_policy")]
    pub status: RateLimitPolicy,
    /// Upper bound on tracked client keys per limiter after a sweep.
    #[serde(default = "default_max_tracked_keys")]
    pub max_tracked_keys: usize,
    /// Interval between background sweeps in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            signup: default_signup_policy(),
            status: default_status_policy(),
            max_tracked_keys: default_max_tracked_keys(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_signup_policy() -> RateLimitPolicy {
    RateLimitPolicy {
        max_requests: 3,
        window_seconds: 60,
    }
}

fn default_status_policy() -> RateLimitPolicy {
    RateLimitPolicy {
        max_requests: 30,
        window_seconds: 60,
    }
}

fn default_max_tracked_keys() -> usize {
    10_000
}

fn default_sweep_interval() -> u64 {
    300
}
