//! Registration listing and lookup commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use waitlist_core::error::AppError;
use waitlist_database::repositories::RegistrationRepository;
use waitlist_entity::registration::Registration;

/// Arguments for the recent command
#[derive(Debug, Args)]
pub struct RecentArgs {
    /// Maximum number of registrations to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,
}

/// Arguments for the lookup command
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Email to look up (matched case-insensitively)
    pub email: String,
}

/// Registration row for display
#[derive(Debug, Serialize, Tabled)]
struct RegistrationRow {
    #[tabled(rename = "Slot")]
    slot: i64,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Social")]
    social: String,
    #[tabled(rename = "Locale")]
    locale: String,
    #[tabled(rename = "Registered")]
    created_at: String,
}

impl From<Registration> for RegistrationRow {
    fn from(r: Registration) -> Self {
        Self {
            slot: r.slot_number,
            email: r.email,
            social: r.social.unwrap_or_else(|| "-".to_string()),
            locale: r.locale,
            created_at: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// List the newest registrations
pub async fn recent(args: &RecentArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    let rows: Vec<RegistrationRow> = RegistrationRepository::new(pool.clone())
        .find_recent(args.limit)
        .await?
        .into_iter()
        .map(RegistrationRow::from)
        .collect();
    output::print_list(&rows, format);

    pool.close().await;
    Ok(())
}

/// Report whether an email is registered, and with which slot
pub async fn lookup(args: &LookupArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;
    let repo = RegistrationRepository::new(pool.clone());

    let email = args.email.trim().to_lowercase();
    match repo.find_by_email(&email).await? {
        Some(registration) => output::print_success(&format!(
            "{} holds slot #{}",
            email, registration.slot_number
        )),
        None => output::print_warning(&format!("{} is not registered", email)),
    }

    pool.close().await;
    Ok(())
}
