//! # waitlist-api
//!
//! HTTP API layer for the waitlist gate built on Axum.
//!
//! Exposes the signup, slots and health endpoints under `/api`, together
//! with the client identity extractor, CORS and request logging
//! middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
