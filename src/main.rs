//! Waitlist gate server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use waitlist_core::config::AppConfig;
use waitlist_core::error::AppError;
use waitlist_core::traits::SlotAllocator;
use waitlist_database::DatabasePool;
use waitlist_database::DatabaseSlotAllocator;
use waitlist_database::repositories::CapacityRepository;
use waitlist_service::rate_limit::spawn_sweeper;
use waitlist_service::{RateLimiters, RetryPolicy, SignupService};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "Server error");
        std::process::exit(1);
    }
}

/// Load and validate configuration for `WAITLIST_ENV`
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("WAITLIST_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        capacity = config.capacity.total,
        "Starting waitlist gate"
    );

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    waitlist_database::migration::run_migrations(db.pool()).await?;
    CapacityRepository::new(db.pool().clone())
        .initialize(config.capacity.total)
        .await?;

    // ── Step 2: Services ─────────────────────────────────────────
    let allocator: Arc<dyn SlotAllocator> =
        Arc::new(DatabaseSlotAllocator::new(db.pool().clone()));
    let limiters = RateLimiters::from_config(&config.rate_limit);
    let signup_service = Arc::new(SignupService::new(
        allocator,
        limiters.clone(),
        RetryPolicy::from_config(&config.retry),
    ));

    // ── Step 3: Shutdown channel & limiter sweeper ───────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(
        limiters,
        Duration::from_secs(config.rate_limit.sweep_interval_seconds),
        shutdown_rx,
    );

    // ── Step 4: Build and start HTTP server ──────────────────────
    let config = Arc::new(config);
    let app_state = waitlist_api::AppState::new(Arc::clone(&config), signup_service);
    let app = waitlist_api::build_app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(%addr, "Waitlist server listening");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 5: Wait for background tasks ────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    if tokio::time::timeout(grace, sweeper).await.is_err() {
        tracing::warn!("Rate limit sweeper did not stop in time");
    }
    db.close().await;

    tracing::info!("Waitlist server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
