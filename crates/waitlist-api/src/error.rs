//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use waitlist_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiErrorResponse;

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    /// The domain error.
    pub inner: AppError,
    /// Seconds a rate-limited client should wait.
    retry_after: Option<u64>,
}

impl ApiError {
    /// Attach a retry hint, reported only for rate-limited responses.
    pub fn retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }
}

impl From<AppError> for ApiError {
    fn from(inner: AppError) -> Self {
        Self {
            inner,
            retry_after: None,
        }
    }
}

/// Status and machine-readable code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
        ErrorKind::CapacityExhausted => (StatusCode::CONFLICT, "CAPACITY_EXHAUSTED"),
        ErrorKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        ErrorKind::TransientStorage
        | ErrorKind::StorageUnavailable
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.inner.kind;
        let (status, error_code) = status_for(kind);

        let message = if self.inner.is_client_error() {
            self.inner.message.clone()
        } else {
            tracing::error!(kind = %kind, error = ?self.inner, "Internal server error");
            "Internal server error".to_string()
        };

        let retry_after = self.retry_after.filter(|_| kind == ErrorKind::RateLimited);
        let details = (kind == ErrorKind::CapacityExhausted)
            .then(|| serde_json::json!({ "remaining": 0 }));

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details,
            retry_after,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}
