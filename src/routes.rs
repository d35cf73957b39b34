//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET    /`                 - Service banner
//! - `GET    /health`           - Health check: DB, cache, click queue
//! - `GET    /{code}`           - Short link redirect
//! - `POST   /api/shorten`      - Create a short URL
//! - `GET    /api/urls/{code}`  - Record details
//! - `DELETE /api/urls/{code}`  - Delete a short URL
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, the API is meant to be called from browsers
//! - **Timeout** - Per-request deadline covering store and cache calls
//! - **Path normalization** - Trailing slash handling

use std::time::Duration;

use crate::api;
use crate::api::handlers::{health_handler, index_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Builds the routes with state and tracing, without outer middleware.
///
/// Static routes are matched before `/{code}`, so `health` and `api` can
/// never resolve as short codes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `request_timeout` - deadline after which a request is answered with
///   `408 Request Timeout`
pub fn app_router(state: AppState, request_timeout: Duration) -> NormalizePath<Router> {
    let router = router(state)
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
