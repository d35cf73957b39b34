//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::application::services::{ShortenCommand, ShortenedUrl};

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten.
    #[serde(default)]
    #[validate(
        length(min = 1, message = "original_url is required"),
        url(message = "original_url must be a valid URL")
    )]
    pub original_url: String,

    /// Optional caller-chosen code (4-20 alphanumeric characters).
    #[validate(length(
        min = 4,
        max = 20,
        message = "custom_alias must be 4-20 alphanumeric characters"
    ))]
    pub custom_alias: Option<String>,

    /// Optional expiry timestamp (RFC 3339).
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenRequest> for ShortenCommand {
    fn from(req: ShortenRequest) -> Self {
        Self {
            original_url: req.original_url,
            custom_alias: req.custom_alias,
            expires_at: req.expires_at,
        }
    }
}

/// Response for a created short URL.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenedUrl> for ShortenResponse {
    fn from(s: ShortenedUrl) -> Self {
        Self {
            short_url: s.short_url,
            original_url: s.original_url,
            short_code: s.short_code,
            created_at: s.created_at,
            expires_at: s.expires_at,
        }
    }
}
