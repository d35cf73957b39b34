//! URL record entity.

use chrono::{DateTime, Utc};

/// A shortened URL as stored in the durable store.
///
/// `short_code` is the canonical key. When the record was created with a
/// custom alias, `custom_alias` holds the same value and both fields share
/// one lookup namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        custom_alias: Option<String>,
        clicks: i64,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            custom_alias,
            clicks,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the record was created with an expiry already in the past.
    ///
    /// This compares `expires_at` against `created_at`, not against the
    /// current time: a record whose expiry lies in the future at creation
    /// keeps resolving after that instant passes.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| e < self.created_at)
    }

    /// Returns true if `code` addresses this record.
    pub fn matches_code(&self, code: &str) -> bool {
        self.short_code == code || self.custom_alias.as_deref() == Some(code)
    }

    /// Every key this record may be cached under.
    pub fn cache_keys(&self) -> Vec<&str> {
        let mut keys = vec![self.short_code.as_str()];
        if let Some(alias) = self.custom_alias.as_deref()
            && alias != self.short_code
        {
            keys.push(alias);
        }
        keys
    }
}

/// Input data for creating a new URL record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: Option<DateTime<Utc>>, created_at: DateTime<Utc>) -> UrlRecord {
        UrlRecord::new(
            1,
            "https://example.com".to_string(),
            "abc1234".to_string(),
            None,
            0,
            created_at,
            expires_at,
        )
    }

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let rec = record(None, now);

        assert_eq!(rec.id, 1);
        assert_eq!(rec.short_code, "abc1234");
        assert_eq!(rec.clicks, 0);
        assert_eq!(rec.created_at, now);
        assert!(!rec.is_expired());
    }

    #[test]
    fn test_expiry_before_creation_is_expired() {
        let now = Utc::now();
        let rec = record(Some(now - Duration::hours(1)), now);
        assert!(rec.is_expired());
    }

    #[test]
    fn test_expiry_after_creation_is_not_expired() {
        let created = Utc::now() - Duration::days(2);
        // Past relative to now, but after created_at.
        let rec = record(Some(created + Duration::days(1)), created);
        assert!(!rec.is_expired());
    }

    #[test]
    fn test_expiry_equal_to_creation_is_not_expired() {
        let now = Utc::now();
        let rec = record(Some(now), now);
        assert!(!rec.is_expired());
    }

    #[test]
    fn test_matches_code_and_alias() {
        let mut rec = record(None, Utc::now());
        rec.custom_alias = Some("promo2024".to_string());

        assert!(rec.matches_code("abc1234"));
        assert!(rec.matches_code("promo2024"));
        assert!(!rec.matches_code("other"));
    }

    #[test]
    fn test_cache_keys_deduplicates_alias() {
        let mut rec = record(None, Utc::now());
        rec.short_code = "promo2024".to_string();
        rec.custom_alias = Some("promo2024".to_string());
        assert_eq!(rec.cache_keys(), vec!["promo2024"]);

        rec.short_code = "abc1234".to_string();
        assert_eq!(rec.cache_keys(), vec!["abc1234", "promo2024"]);
    }
}
