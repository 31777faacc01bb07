//! # waitlist-entity
//!
//! Row models for the waitlist tables. Every struct derives `Debug`,
//! `Clone`, `Serialize`, `Deserialize` and `sqlx::FromRow`.

pub mod registration;
