//! Capacity query handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::SlotsResponse;
use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// GET /api/slots
pub async fn slots(
    State(state): State<AppState>,
    client: ClientInfo,
) -> Result<Json<SlotsResponse>, ApiError> {
    let service = &state.signup_service;
    let retry_after = service.limiters().status.window().as_secs();

    let snapshot = service
        .slots(client.ip())
        .await
        .map_err(|e| ApiError::from(e).retry_after(retry_after))?;

    Ok(Json(snapshot.into()))
}
