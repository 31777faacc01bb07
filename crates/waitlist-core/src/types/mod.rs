//! Shared domain types used across crate boundaries.

pub mod locale;
pub mod slot;

pub use locale::Locale;
pub use slot::{CapacitySnapshot, NewSignup, SlotGrant};
