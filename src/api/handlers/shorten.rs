//! Handler for the link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use tracing::debug;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/a/b",
///   "custom_alias": "promo2024",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// Only `original_url` is required.
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "short_url": "http://localhost:3000/promo2024",
///   "original_url": "https://example.com/a/b",
///   "short_code": "promo2024",
///   "created_at": "2026-01-01T12:00:00Z",
///   "expires_at": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 for a malformed body or invalid fields
/// - 409 if the alias is already taken
/// - 500 if the store fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(mut payload) = payload.map_err(|rejection| {
        debug!(error = %rejection, "rejected shorten request body");
        AppError::bad_request("Invalid request body")
    })?;

    // An empty alias means "generate one".
    payload.custom_alias = payload.custom_alias.filter(|alias| !alias.is_empty());
    payload.validate()?;

    let shortened = state.url_service.shorten(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(shortened.into())))
}
