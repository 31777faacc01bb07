//! # waitlist-core
//!
//! Core crate for the waitlist gate. Contains configuration schemas,
//! shared slot/locale types, the slot allocator trait, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other waitlist crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
