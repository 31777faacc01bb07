//! Request and response DTOs.

pub mod response;

pub use response::{ApiErrorResponse, HealthResponse, SignupResponse, SlotsResponse};
