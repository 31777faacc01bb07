//! Signup admission.

pub mod request;
pub mod service;

pub use request::{ClientMeta, SignupReceipt, SignupRequest};
pub use service::{SignupService, describe};
