//! Handler for the service banner.

/// Confirms the service is up.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> &'static str {
    "snaplink URL shortener is running"
}
