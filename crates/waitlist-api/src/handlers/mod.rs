//! Route handlers.

pub mod health;
pub mod signup;
pub mod slots;
