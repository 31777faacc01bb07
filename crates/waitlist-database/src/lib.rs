//! # waitlist-database
//!
//! SQLite connection management, repositories for registrations and the
//! capacity counter, and [`DatabaseSlotAllocator`], the only code path that
//! mutates the counter.

pub mod allocator;
pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use allocator::DatabaseSlotAllocator;
pub use connection::DatabasePool;
