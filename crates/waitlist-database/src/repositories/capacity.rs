//! Capacity counter repository.
//!
//! The counter lives in the `config` table under [`SLOTS_REMAINING_KEY`];
//! the total it was seeded from sits next to it under [`CAPACITY_TOTAL_KEY`].

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use waitlist_core::error::AppError;
use waitlist_core::result::AppResult;
use waitlist_core::types::CapacitySnapshot;

use crate::error::map_sqlx_error;

/// Key of the remaining-slots counter.
pub const SLOTS_REMAINING_KEY: &str = "slots_remaining";
/// Key of the total the counter was seeded with.
pub const CAPACITY_TOTAL_KEY: &str = "capacity_total";

/// Access to the persistent capacity counter.
#[derive(Debug, Clone)]
pub struct CapacityRepository {
    pool: SqlitePool,
}

impl CapacityRepository {
    /// Create a new capacity repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Seed the counter on first start.
    ///
    /// Idempotent: an existing counter is left untouched, so restarts never
    /// hand out slots twice. A configured total that disagrees with the
    /// stored one is reported and ignored.
    pub async fn initialize(&self, total: u32) -> AppResult<CapacitySnapshot> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to begin capacity initialization"))?;

        for key in [CAPACITY_TOTAL_KEY, SLOTS_REMAINING_KEY] {
            sqlx::query("INSERT OR IGNORE INTO config (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(i64::from(total))
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to seed capacity counter"))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to commit capacity initialization"))?;

        let snapshot = self.snapshot().await?;
        if snapshot.total != total {
            warn!(
                configured = total,
                stored = snapshot.total,
                "Configured capacity differs from the initialized store; keeping stored value"
            );
        }
        info!(
            total = snapshot.total,
            remaining = snapshot.remaining,
            filled = snapshot.filled,
            "Capacity counter ready"
        );
        Ok(snapshot)
    }

    /// Read remaining, total and filled inside one read transaction.
    pub async fn snapshot(&self) -> AppResult<CapacitySnapshot> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to begin capacity snapshot"))?;

        let total = read_value(&mut *tx, CAPACITY_TOTAL_KEY).await?;
        let remaining = fetch_remaining(&mut *tx).await?;
        let filled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to count registrations"))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to finish capacity snapshot"))?;

        Ok(CapacitySnapshot {
            remaining: to_count(remaining),
            total: to_count(total),
            filled: to_count(filled),
        })
    }
}

pub(crate) async fn fetch_remaining(conn: &mut SqliteConnection) -> AppResult<i64> {
    read_value(conn, SLOTS_REMAINING_KEY).await
}

/// Decrement the counter, returning the new value.
///
/// Returns `None` when the counter is already at zero; the guard in the
/// `WHERE` clause keeps it from ever going negative.
pub(crate) async fn decrement(conn: &mut SqliteConnection) -> AppResult<Option<i64>> {
    sqlx::query_scalar(
        "UPDATE config SET value = value - 1, updated_at = CURRENT_TIMESTAMP \
         WHERE key = ? AND value > 0 RETURNING value",
    )
    .bind(SLOTS_REMAINING_KEY)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error(e, "Failed to decrement capacity counter"))
}

async fn read_value(conn: &mut SqliteConnection, key: &str) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT value FROM config WHERE key = ?")
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to read capacity counter"))?
        .ok_or_else(|| {
            AppError::configuration(format!("Capacity counter '{key}' has not been initialized"))
        })
}

pub(crate) fn to_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
