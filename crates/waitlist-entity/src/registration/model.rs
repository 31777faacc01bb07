//! Registration domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use waitlist_core::types::Locale;

/// One confirmed signup holding exactly one slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    /// Unique registration ID.
    pub id: Uuid,
    /// Normalized (trimmed, lower-cased) email.
    pub email: String,
    /// Sanitized social handle.
    pub social: Option<String>,
    /// Assigned slot, never reused.
    pub slot_number: i64,
    /// Locale code (`ru` or `en`).
    pub locale: String,
    /// Client address at signup time.
    pub ip_address: Option<String>,
    /// Client user agent at signup time.
    pub user_agent: Option<String>,
    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Parsed locale, `None` if the stored code is no longer supported.
    pub fn locale(&self) -> Option<Locale> {
        self.locale.parse().ok()
    }
}
