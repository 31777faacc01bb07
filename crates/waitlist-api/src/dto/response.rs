//! Response DTOs.

use serde::{Deserialize, Serialize};

use waitlist_core::types::CapacitySnapshot;
use waitlist_service::SignupReceipt;

/// Body of a successful `POST /api/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// Always `true`.
    pub success: bool,
    /// Slot handed out.
    pub slot_number: u32,
    /// Slots still open.
    pub remaining: u32,
    /// Localized confirmation line.
    pub message: String,
}

impl From<SignupReceipt> for SignupResponse {
    fn from(receipt: SignupReceipt) -> Self {
        Self {
            success: true,
            slot_number: receipt.slot_number,
            remaining: receipt.remaining,
            message: receipt.message,
        }
    }
}

/// Body of `GET /api/slots`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsResponse {
    /// Slots still open.
    pub remaining: u32,
    /// Slots offered.
    pub total: u32,
    /// Registrations so far.
    pub filled: u32,
}

impl From<CapacitySnapshot> for SlotsResponse {
    fn from(snapshot: CapacitySnapshot) -> Self {
        Self {
            remaining: snapshot.remaining,
            total: snapshot.total,
            filled: snapshot.filled,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process serves requests.
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    /// Seconds since startup.
    pub uptime: f64,
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Seconds to wait before retrying a rate-limited request.
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}
