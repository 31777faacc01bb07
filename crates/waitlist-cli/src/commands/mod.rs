//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod registrations;
pub mod slots;

use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use crate::output::OutputFormat;
use waitlist_core::config::AppConfig;
use waitlist_core::error::AppError;
use waitlist_database::DatabasePool;

/// Waitlist gate administration
#[derive(Debug, Parser)]
#[command(name = "waitlist", version, about, long_about = None)]
pub struct Cli {
    /// Configuration overlay to load (`config/<env>.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Show remaining, total and filled slots
    Slots,
    /// List the most recent registrations
    Recent(registrations::RecentArgs),
    /// Check whether an email already holds a slot
    Lookup(registrations::LookupArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Slots => slots::execute(&self.env, self.format).await,
            Commands::Recent(args) => registrations::recent(args, &self.env, self.format).await,
            Commands::Lookup(args) => registrations::lookup(args, &self.env).await,
            Commands::Config(args) => config::execute(args, &self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for an environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<SqlitePool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
