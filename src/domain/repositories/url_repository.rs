//! Repository trait for URL record storage.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store for URL records.
///
/// Lookups by code match either `short_code` or `custom_alias` with the same
/// input. The store owns uniqueness of both fields.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new record, assigning `id`, `clicks = 0` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasConflict`] if the short code or alias is taken.
    /// Returns [`AppError::Persistence`] on database errors.
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record whose short code or custom alias equals `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Adds one click to the record addressed by `code`.
    ///
    /// Succeeds without effect when nothing matches.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Permanently removes the record addressed by `code`.
    ///
    /// Returns `Ok(true)` if a record was removed, `Ok(false)` otherwise.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
