//! API route configuration.

use crate::api::handlers::{delete_url_handler, shorten_handler, url_details_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`      - Create a short URL
/// - `GET    /urls/{code}`  - Stored record with click count
/// - `DELETE /urls/{code}`  - Delete a short URL
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/urls/{code}",
            get(url_details_handler).delete(delete_url_handler),
        )
}
