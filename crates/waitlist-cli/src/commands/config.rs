//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use waitlist_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the effective configuration
    Validate,
}

/// Execute config commands
pub async fn execute(args: &ConfigArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(env)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Table => println!("{:#?}", config),
            }
        }
        ConfigCommand::Validate => {
            let config = super::load_config(env)?;
            if let Err(e) = config.validate() {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
            output::print_success(&format!("Configuration '{}' is valid", env));
            output::print_kv(
                "Server",
                &format!("{}:{}", config.server.host, config.server.port),
            );
            output::print_kv("Database", &config.database.url);
            output::print_kv("Capacity", &config.capacity.total.to_string());
            output::print_kv(
                "Signup limit",
                &format!(
                    "{}/{}s",
                    config.rate_limit.signup.max_requests, config.rate_limit.signup.window_seconds
                ),
            );
            output::print_kv(
                "Status limit",
                &format!(
                    "{}/{}s",
                    config.rate_limit.status.max_requests, config.rate_limit.status.window_seconds
                ),
            );
        }
    }

    Ok(())
}
