//! Handlers for inspecting and deleting short URLs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::url::UrlDetailsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored record for a code, including its click counter.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// # Errors
///
/// Returns 404 if no record matches the code or alias.
pub async fn url_details_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlDetailsResponse>, AppError> {
    let record = state.url_service.get_by_code(&code).await?;
    let short_url = state.url_service.short_url(&record.short_code);

    Ok(Json(UrlDetailsResponse::new(record, short_url)))
}

/// Permanently deletes a short URL and evicts its cache entries.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
///
/// # Errors
///
/// Returns 404 if no record matches the code or alias.
pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}
