//! Core traits defined in `waitlist-core` and implemented by other crates.

pub mod slot_allocator;

pub use slot_allocator::SlotAllocator;
