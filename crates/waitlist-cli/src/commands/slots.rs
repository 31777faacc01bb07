//! Capacity snapshot command.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use waitlist_core::error::AppError;
use waitlist_core::types::CapacitySnapshot;
use waitlist_database::repositories::CapacityRepository;

/// Capacity row for display
#[derive(Debug, Serialize, Tabled)]
struct SlotsRow {
    #[tabled(rename = "Remaining")]
    remaining: u32,
    #[tabled(rename = "Total")]
    total: u32,
    #[tabled(rename = "Filled")]
    filled: u32,
}

impl From<CapacitySnapshot> for SlotsRow {
    fn from(snapshot: CapacitySnapshot) -> Self {
        Self {
            remaining: snapshot.remaining,
            total: snapshot.total,
            filled: snapshot.filled,
        }
    }
}

/// Print the current capacity snapshot
pub async fn execute(env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    let snapshot = CapacityRepository::new(pool.clone()).snapshot().await?;
    output::print_item(&SlotsRow::from(snapshot), format);

    pool.close().await;
    Ok(())
}
