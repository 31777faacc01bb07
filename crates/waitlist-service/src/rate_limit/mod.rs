//! Per-client request throttling for the two endpoint classes.

pub mod limiter;
pub mod sweeper;

use std::sync::Arc;

use waitlist_core::config::RateLimitConfig;

pub use limiter::{SlidingWindowLimiter, SweepStats};
pub use sweeper::spawn_sweeper;

/// The strict signup limiter and the relaxed status limiter.
///
/// The two share nothing; exhausting one leaves the other untouched.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    /// Budget for `POST /api/signup`.
    pub signup: Arc<SlidingWindowLimiter>,
    /// Budget for read-only status queries.
    pub status: Arc<SlidingWindowLimiter>,
}

impl RateLimiters {
    /// Build both limiters from configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            signup: Arc::new(SlidingWindowLimiter::from_policy(
                "signup",
                &config.signup,
                config.max_tracked_keys,
            )),
            status: Arc::new(SlidingWindowLimiter::from_policy(
                "status",
                &config.status,
                config.max_tracked_keys,
            )),
        }
    }

    /// Both limiters, for maintenance passes.
    pub fn all(&self) -> [&Arc<SlidingWindowLimiter>; 2] {
        [&self.signup, &self.status]
    }
}
