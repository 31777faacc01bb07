//! The slot allocation transaction.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use waitlist_core::error::AppError;
use waitlist_core::result::AppResult;
use waitlist_core::traits::SlotAllocator;
use waitlist_core::types::{CapacitySnapshot, NewSignup, SlotGrant};

use crate::error::map_sqlx_error;
use crate::repositories::capacity::{self, CapacityRepository};
use crate::repositories::registration;

/// SQLite-backed slot allocator.
///
/// Writers are serialized twice over: an in-process gate keeps allocation
/// transactions from interleaving on this node, and SQLite's own write lock
/// covers any other process sharing the file. Contention on the latter
/// surfaces as `TransientStorage` and is left to the retry executor.
#[derive(Debug, Clone)]
pub struct DatabaseSlotAllocator {
    pool: SqlitePool,
    capacity: CapacityRepository,
    write_gate: Arc<Mutex<()>>,
}

impl DatabaseSlotAllocator {
    /// Create an allocator over an already migrated and initialized pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            capacity: CapacityRepository::new(pool.clone()),
            pool,
            write_gate: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl SlotAllocator for DatabaseSlotAllocator {
    async fn allocate(&self, signup: &NewSignup) -> AppResult<SlotGrant> {
        let _gate = self.write_gate.lock().await;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to begin allocation transaction"))?;

        let remaining = capacity::fetch_remaining(&mut *tx).await?;
        if remaining <= 0 {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to roll back allocation"))?;
            debug!(email = %signup.email, "Allocation refused: capacity exhausted");
            return Err(AppError::capacity_exhausted("All slots have been taken"));
        }

        if registration::email_exists_in(&mut *tx, &signup.email).await? {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to roll back allocation"))?;
            debug!(email = %signup.email, "Allocation refused: duplicate email");
            return Err(AppError::duplicate_email("Email already registered"));
        }

        let slot_number = registration::next_slot_number(&mut *tx).await?;
        let id = Uuid::now_v7();
        registration::insert(&mut *tx, id, slot_number, signup).await?;

        let Some(remaining) = capacity::decrement(&mut *tx).await? else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error(e, "Failed to roll back allocation"))?;
            return Err(AppError::capacity_exhausted("All slots have been taken"));
        };

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to commit allocation"))?;

        let grant = SlotGrant {
            registration_id: id,
            slot_number: capacity::to_count(slot_number),
            remaining: capacity::to_count(remaining),
        };
        info!(
            registration_id = %grant.registration_id,
            slot_number = grant.slot_number,
            remaining = grant.remaining,
            "Slot allocated"
        );
        Ok(grant)
    }

    async fn snapshot(&self) -> AppResult<CapacitySnapshot> {
        self.capacity.snapshot().await
    }
}
