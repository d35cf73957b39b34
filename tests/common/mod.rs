#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use snaplink::application::services::{ShortenerSettings, UrlService};
use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::entities::{NewUrlRecord, UrlRecord};
use snaplink::domain::repositories::UrlRepository;
use snaplink::error::AppError;
use snaplink::infrastructure::cache::{CacheError, CacheResult, CacheService};
use snaplink::routes::router;
use snaplink::state::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://sho.rt";

/// Store double that enforces the same uniqueness rules as the `urls` table.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: Mutex<Vec<UrlRecord>>,
    next_id: AtomicI64,
    down: AtomicBool,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a persistence error.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Inserts a record with explicit timestamps, bypassing the service.
    pub fn insert_raw(
        &self,
        original_url: &str,
        short_code: &str,
        custom_alias: Option<&str>,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> UrlRecord {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = UrlRecord::new(
            id,
            original_url.to_string(),
            short_code.to_string(),
            custom_alias.map(str::to_string),
            0,
            created_at,
            expires_at,
        );
        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn clicks(&self, code: &str) -> Option<i64> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.matches_code(code))
            .map(|r| r.clicks)
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check_up(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            Err(AppError::persistence("Database error"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_url: NewUrlRecord) -> Result<UrlRecord, AppError> {
        self.check_up()?;
        let mut records = self.records.lock().unwrap();

        let taken = |value: &str| {
            records.iter().any(|r| {
                r.short_code == value || r.custom_alias.as_deref() == Some(value)
            })
        };
        if taken(&new_url.short_code)
            || new_url.custom_alias.as_deref().is_some_and(|alias| taken(alias))
        {
            let key = new_url.custom_alias.unwrap_or(new_url.short_code);
            return Err(AppError::alias_conflict(key));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = UrlRecord::new(
            id,
            new_url.original_url,
            new_url.short_code,
            new_url.custom_alias,
            0,
            Utc::now(),
            new_url.expires_at,
        );
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, AppError> {
        self.check_up()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.matches_code(code))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        self.check_up()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        self.check_up()?;
        if let Some(record) = self
            .records
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.matches_code(code))
        {
            record.clicks += 1;
        }
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        self.check_up()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !r.matches_code(code));
        Ok(records.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_up()
    }
}

/// Cache double backed by a map; TTLs are recorded but not enforced.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Option<u64>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(code)
            .map(|(url, _)| url.clone())
    }

    pub fn ttl(&self, code: &str) -> Option<u64> {
        self.entries
            .lock()
            .unwrap()
            .get(code)
            .and_then(|(_, ttl)| *ttl)
    }

    pub fn put(&self, code: &str, url: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), (url.to_string(), None));
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        Ok(self.get(code))
    }

    async fn set_url(
        &self,
        code: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(code.to_string(), (original_url.to_string(), ttl_seconds));
        Ok(())
    }

    async fn invalidate(&self, code: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(code);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache whose every operation fails, as when Redis is unreachable.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get_url(&self, _code: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn set_url(
        &self,
        _code: &str,
        _original_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn invalidate(&self, _code: &str) -> CacheResult<()> {
        Err(CacheError::Connection("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Everything a handler test needs to drive and inspect the service.
pub struct TestContext {
    pub state: AppState,
    pub repository: Arc<InMemoryUrlRepository>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

impl TestContext {
    pub fn server(&self) -> TestServer {
        TestServer::new(router(self.state.clone())).unwrap()
    }

    /// Drains queued click events without waiting.
    pub fn queued_clicks(&mut self) -> Vec<String> {
        let mut codes = Vec::new();
        while let Ok(event) = self.click_rx.try_recv() {
            codes.push(event.code);
        }
        codes
    }
}

pub fn create_test_state(cache: Arc<dyn CacheService>) -> TestContext {
    let repository = Arc::new(InMemoryUrlRepository::new());
    let (tx, rx) = mpsc::channel(100);

    let settings = ShortenerSettings {
        code_length: 7,
        base_url: format!("{BASE_URL}/"),
        cache_ttl_seconds: 3600,
    };
    let url_service = Arc::new(UrlService::new(
        repository.clone(),
        cache.clone(),
        tx.clone(),
        settings,
    ));

    TestContext {
        state: AppState::new(url_service, cache, tx),
        repository,
        click_rx: rx,
    }
}

pub fn create_default_state() -> (TestContext, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    (create_test_state(cache.clone()), cache)
}
