//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `WAITLIST__`-prefixed environment variables.
//! Every field carries a default so an empty configuration is valid.

pub mod app;
pub mod capacity;
pub mod logging;
pub mod rate_limit;
pub mod retry;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::capacity::CapacityConfig;
pub use self::logging::LoggingConfig;
pub use self::rate_limit::{RateLimitConfig, RateLimitPolicy};
pub use self::retry::RetryConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Slot capacity settings.
    #[serde(default)]
    pub capacity: CapacityConfig,
    /// Per-client request throttling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Transient storage failure retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite://path/to/file.db` or `sqlite::memory:`).
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Pool acquire timeout in seconds.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// How long SQLite waits on a locked database before reporting busy.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_seconds: default_acquire_timeout(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the URL points at a private in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml`, the environment overlay
    /// `config/{env}.toml` and environment variables prefixed with
    /// `WAITLIST__`, then applies the legacy single-variable overrides
    /// (`MAX_SIGNUPS`, `DB_PATH`, `PORT`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WAITLIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.apply_legacy_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply the flat environment variables older deployments rely on.
    ///
    /// `lookup` abstracts the environment so the precedence rules stay
    /// testable without mutating process state.
    pub fn apply_legacy_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("MAX_SIGNUPS") {
            match capacity::parse_capacity(&raw) {
                Some(total) => self.capacity.total = total,
                None => tracing::warn!(
                    value = %raw,
                    fallback = self.capacity.total,
                    "Ignoring invalid MAX_SIGNUPS"
                ),
            }
        }

        if let Some(path) = lookup("DB_PATH").filter(|p| !p.trim().is_empty()) {
            self.database.url = format!("sqlite://{}", path.trim());
        }

        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid PORT"),
            }
        }
    }

    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.capacity.total == 0 {
            return Err(AppError::configuration("capacity.total must be positive"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::configuration(
                "database.max_connections must be positive",
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::configuration(
                "database.min_connections exceeds database.max_connections",
            ));
        }
        for (name, policy) in [
            ("signup", &self.rate_limit.signup),
            ("status", &self.rate_limit.status),
        ] {
            if policy.max_requests == 0 || policy.window_seconds == 0 {
                return Err(AppError::configuration(format!(
                    "rate_limit.{name} needs a positive max_requests and window_seconds"
                )));
            }
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(AppError::configuration(
                "retry.backoff_multiplier must be at least 1.0",
            ));
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    "sqlite://data/waitlist.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

fn default_min_connections() -> u32 {
    1
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_busy_timeout() -> u64 {
    5000
}
