//! Slot allocator trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::slot::{CapacitySnapshot, NewSignup, SlotGrant};

/// Atomic slot reservation against durable storage.
///
/// Implementations must be thread-safe. `allocate` either commits one
/// registration together with one counter decrement, or writes nothing.
#[async_trait]
pub trait SlotAllocator: Send + Sync + std::fmt::Debug {
    /// Reserve the next slot for `signup`.
    ///
    /// Fails with `CapacityExhausted` when no slot remains and with
    /// `DuplicateEmail` when the email already holds one; neither consumes
    /// capacity. Storage contention surfaces as `TransientStorage`.
    async fn allocate(&self, signup: &NewSignup) -> AppResult<SlotGrant>;

    /// Report remaining, total and filled counts.
    async fn snapshot(&self) -> AppResult<CapacitySnapshot>;
}
