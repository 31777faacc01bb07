//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use waitlist_core::error::AppError;
use waitlist_database::repositories::CapacityRepository;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations and seed the capacity counter
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    config.validate()?;
    let pool = super::create_db_pool(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            waitlist_database::migration::run_migrations(&pool).await?;
            let snapshot = CapacityRepository::new(pool.clone())
                .initialize(config.capacity.total)
                .await?;
            output::print_success("All migrations applied successfully.");
            output::print_kv("Capacity", &snapshot.total.to_string());
            output::print_kv("Remaining", &snapshot.remaining.to_string());
            if snapshot.total != config.capacity.total {
                output::print_warning(&format!(
                    "Stored capacity {} differs from configured {}; the stored value is kept",
                    snapshot.total, config.capacity.total
                ));
            }
        }
    }

    pool.close().await;
    Ok(())
}
