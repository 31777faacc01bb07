//! Signup handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::debug;

use waitlist_core::error::AppError;
use waitlist_service::SignupRequest;

use crate::dto::response::SignupResponse;
use crate::error::ApiError;
use crate::extractors::ClientInfo;
use crate::state::AppState;

/// POST /api/signup
///
/// An unreadable body is still charged to the client's signup budget so
/// malformed floods are throttled like any other attempt.
pub async fn signup(
    State(state): State<AppState>,
    client: ClientInfo,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let service = &state.signup_service;
    let retry_after = service.limiters().signup.window().as_secs();
    let client = client.into_meta();

    let result = match payload {
        Ok(Json(request)) => service.register(request, &client).await,
        Err(rejection) => match service.admit(&client.ip).await {
            Ok(()) => {
                debug!(error = %rejection.body_text(), "Unreadable signup body");
                Err(AppError::validation("Invalid request body"))
            }
            Err(err) => Err(err),
        },
    };

    let receipt = result.map_err(|e| ApiError::from(e).retry_after(retry_after))?;
    Ok((StatusCode::CREATED, Json(receipt.into())))
}
