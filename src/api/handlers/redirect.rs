//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look the code up in the cache
/// 2. On a miss, read the store and repopulate the cache
/// 3. Queue a click increment (never awaited)
/// 4. Return 301 Moved Permanently
///
/// # Errors
///
/// Every resolution failure, expired links included, is reported as
/// 404 `{"error": "URL not found"}`.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.url_service.resolve(&code).await.map_err(|e| {
        match &e {
            AppError::Persistence { .. } => error!(code = %code, error = %e, "resolution failed"),
            _ => debug!(code = %code, error = %e, "resolution refused"),
        }
        AppError::not_found(code.clone())
    })?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, original_url)],
    ))
}
