//! # waitlist-service
//!
//! Business logic for the waitlist gate. [`SignupService`] runs every
//! request through rate limiting, validation and a retried allocation
//! against a [`waitlist_core::traits::SlotAllocator`].
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod rate_limit;
pub mod retry;
pub mod signup;
pub mod validation;

pub use rate_limit::{RateLimiters, SlidingWindowLimiter};
pub use retry::{RetryPolicy, with_retry};
pub use signup::{ClientMeta, SignupReceipt, SignupRequest, SignupService};
