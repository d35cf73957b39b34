//! Click event model for asynchronous click accounting.

/// A pending click increment.
///
/// Sent from [`crate::application::services::UrlService::resolve`] to the
/// background worker through a bounded channel, so the redirect never waits
/// for the counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    /// Creates a click event for the code that was resolved.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
