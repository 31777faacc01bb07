//! Slot allocation inputs and outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::locale::Locale;

/// A validated, normalized signup ready for the allocation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSignup {
    /// Trimmed, lower-cased email.
    pub email: String,
    /// Sanitized social handle, if one was given.
    pub social: Option<String>,
    /// Interface language.
    pub locale: Locale,
    /// Best-effort client address.
    pub ip_address: String,
    /// Best-effort client user agent.
    pub user_agent: String,
}

/// The outcome of a committed allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrant {
    /// Identifier of the new registration.
    pub registration_id: Uuid,
    /// Slot handed out, in `1..=total`.
    pub slot_number: u32,
    /// Slots still available after this commit.
    pub remaining: u32,
}

/// Point-in-time view of capacity usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    /// Slots still available.
    pub remaining: u32,
    /// Slots offered in total.
    pub total: u32,
    /// Registrations committed so far.
    pub filled: u32,
}
