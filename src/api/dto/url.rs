//! DTOs for URL record details.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::domain::entities::UrlRecord;

/// Stored state of a short URL, including its click counter.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct UrlDetailsResponse {
    pub id: i64,
    pub short_url: String,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlDetailsResponse {
    /// Builds the response from a record and its public short URL.
    pub fn new(record: UrlRecord, short_url: String) -> Self {
        Self {
            id: record.id,
            short_url,
            original_url: record.original_url,
            short_code: record.short_code,
            custom_alias: record.custom_alias,
            clicks: record.clicks,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}
