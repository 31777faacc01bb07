//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use waitlist_core::config::AppConfig;
use waitlist_service::SignupService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Signup admission pipeline
    pub signup_service: Arc<SignupService>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Creates the state, stamping the start instant.
    pub fn new(config: Arc<AppConfig>, signup_service: Arc<SignupService>) -> Self {
        Self {
            config,
            signup_service,
            started_at: Instant::now(),
        }
    }
}
