//! URL shortening and resolution service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, validate_custom_alias};

/// Tunables for [`UrlService`].
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// Length of generated short codes.
    pub code_length: usize,
    /// Public base URL joined with the code to build `short_url`.
    pub base_url: String,
    /// TTL of cache entries written by the service.
    pub cache_ttl_seconds: u64,
}

/// Input for [`UrlService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenCommand {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a successful [`UrlService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub short_url: String,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Orchestrates code generation, persistence, caching and click accounting.
///
/// The store is the system of record. The cache is consulted first on reads
/// and written after creates and store reads, but every cache failure is
/// logged and ignored. Click increments are queued for the background worker
/// and never awaited.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    click_sender: mpsc::Sender<ClickEvent>,
    settings: ShortenerSettings,
}

impl UrlService {
    /// Creates a new URL service.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            click_sender,
            settings,
        }
    }

    /// Creates a short URL.
    ///
    /// With a custom alias, the alias is validated, checked against both the
    /// code and alias columns, and used verbatim. Without one, the code is
    /// derived from the URL; shortening the same URL again returns the
    /// existing record.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the alias is malformed
    /// - [`AppError::AliasConflict`] if the alias is already in use
    /// - [`AppError::CodeCollision`] if the generated code belongs to another URL
    /// - [`AppError::Persistence`] if the store write fails
    pub async fn shorten(&self, command: ShortenCommand) -> Result<ShortenedUrl, AppError> {
        let ShortenCommand {
            original_url,
            custom_alias,
            expires_at,
        } = command;

        let custom_alias = custom_alias.filter(|alias| !alias.is_empty());

        let short_code = match &custom_alias {
            Some(alias) => {
                validate_custom_alias(alias)?;

                // Early exit only; the unique constraint decides concurrent races.
                if self.repository.find_by_code(alias).await?.is_some() {
                    return Err(AppError::alias_conflict(alias.clone()));
                }

                alias.clone()
            }
            None => {
                let code = generate_code(&original_url, self.settings.code_length);

                if let Some(existing) = self.repository.find_by_code(&code).await? {
                    return self.reuse_existing(existing, &original_url, expires_at).await;
                }

                code
            }
        };

        let generated = custom_alias.is_none();
        let new_url = NewUrlRecord {
            original_url: original_url.clone(),
            short_code: short_code.clone(),
            custom_alias,
            expires_at,
        };

        let record = match self.repository.create(new_url).await {
            Ok(record) => record,
            Err(AppError::AliasConflict { .. }) if generated => {
                // A concurrent request inserted the same generated code first.
                match self.repository.find_by_code(&short_code).await? {
                    Some(existing) => {
                        return self.reuse_existing(existing, &original_url, expires_at).await;
                    }
                    None => return Err(AppError::persistence("Failed to create URL")),
                }
            }
            Err(e) => return Err(e),
        };

        debug!(code = %record.short_code, "short URL created");
        if !record.is_expired() {
            self.cache_put(&record.short_code, &record.original_url)
                .await;
        }

        Ok(self.to_shortened(record))
    }

    /// Resolves a code to its original URL.
    ///
    /// Reads the cache first; on a miss or cache error, reads the store and
    /// repopulates the cache. Both paths queue a click increment.
    ///
    /// A cache hit is served without any expiry check. On the store path,
    /// the record is refused when it was created with an expiry before its
    /// creation time.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no record matches
    /// - [`AppError::Expired`] if the record's expiry condition is met
    /// - [`AppError::Persistence`] if the store read fails
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        match self.cache.get_url(code).await {
            Ok(Some(url)) if !url.is_empty() => {
                debug!(code, "resolved from cache");
                self.schedule_click(code);
                return Ok(url);
            }
            Ok(_) => debug!(code, "cache miss"),
            Err(e) => {
                metrics::counter!("snaplink_cache_errors_total").increment(1);
                warn!(code, error = %e, "cache lookup failed, falling back to store");
            }
        }

        let record = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))?;

        if record.is_expired() {
            return Err(AppError::expired(code));
        }

        self.schedule_click(code);
        self.cache_put(code, &record.original_url).await;

        Ok(record.original_url)
    }

    /// Retrieves a record by code (short code or alias).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches.
    pub async fn get_by_code(&self, code: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(code))
    }

    /// Retrieves a record by its store identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    pub async fn get_by_id(&self, id: i64) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(id.to_string()))
    }

    /// Deletes a record and evicts every cache entry that could serve it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if nothing matched `code`.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        let existing = self.repository.find_by_code(code).await?;

        if !self.repository.delete(code).await? {
            return Err(AppError::not_found(code));
        }

        let mut keys = vec![code.to_string()];
        if let Some(record) = &existing {
            for key in record.cache_keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }

        for key in keys {
            if let Err(e) = self.cache.invalidate(&key).await {
                metrics::counter!("snaplink_cache_errors_total").increment(1);
                warn!(code = %key, error = %e, "failed to evict deleted URL from cache");
            }
        }

        debug!(code, "short URL deleted");
        Ok(())
    }

    /// Checks that the durable store is reachable.
    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), code)
    }

    /// Returns an already stored record for an identical request.
    ///
    /// The record is reused only when it holds the same URL and the same
    /// expiry (compared at the store's microsecond precision) and is not
    /// expired. Anything else is a conflict.
    async fn reuse_existing(
        &self,
        existing: UrlRecord,
        original_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortenedUrl, AppError> {
        if existing.original_url != original_url {
            error!(
                code = %existing.short_code,
                "generated code already belongs to a different URL"
            );
            return Err(AppError::CodeCollision {
                code: existing.short_code,
            });
        }

        if existing.is_expired() {
            debug!(code = %existing.short_code, "URL already shortened with an expired record");
            return Err(AppError::conflict(format!(
                "short code '{}' exists for this URL but has expired",
                existing.short_code
            )));
        }

        let micros = |at: Option<DateTime<Utc>>| at.map(|t| t.timestamp_micros());
        if micros(existing.expires_at) != micros(expires_at) {
            debug!(code = %existing.short_code, "URL already shortened with a different expiry");
            return Err(AppError::conflict(format!(
                "short code '{}' exists for this URL with a different expiry",
                existing.short_code
            )));
        }

        debug!(code = %existing.short_code, "URL already shortened, reusing record");
        self.cache_put(&existing.short_code, &existing.original_url)
            .await;
        Ok(self.to_shortened(existing))
    }

    /// Writes a cache entry, logging and ignoring failures.
    async fn cache_put(&self, code: &str, original_url: &str) {
        if let Err(e) = self
            .cache
            .set_url(code, original_url, Some(self.settings.cache_ttl_seconds))
            .await
        {
            metrics::counter!("snaplink_cache_errors_total").increment(1);
            warn!(code, error = %e, "failed to cache URL");
        }
    }

    /// Queues a click increment without waiting for it.
    fn schedule_click(&self, code: &str) {
        match self.click_sender.try_send(ClickEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics::counter!("snaplink_clicks_dropped_total").increment(1);
                warn!(code, "click queue full, dropping click");
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("snaplink_clicks_dropped_total").increment(1);
                warn!(code, "click queue closed, dropping click");
            }
        }
    }

    fn to_shortened(&self, record: UrlRecord) -> ShortenedUrl {
        ShortenedUrl {
            short_url: self.short_url(&record.short_code),
            original_url: record.original_url,
            short_code: record.short_code,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}
