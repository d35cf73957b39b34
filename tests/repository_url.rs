use chrono::{Duration, Utc};
use snaplink::domain::entities::NewUrlRecord;
use snaplink::domain::repositories::UrlRepository;
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::PgUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_url(original_url: &str, short_code: &str, custom_alias: Option<&str>) -> NewUrlRecord {
    NewUrlRecord {
        original_url: original_url.to_string(),
        short_code: short_code.to_string(),
        custom_alias: custom_alias.map(str::to_string),
        expires_at: None,
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_create_url(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let record = repo
        .create(new_url("https://example.com", "abc1234", None))
        .await
        .unwrap();

    assert!(record.id > 0);
    assert_eq!(record.short_code, "abc1234");
    assert_eq!(record.original_url, "https://example.com");
    assert_eq!(record.clicks, 0);
    assert!(record.custom_alias.is_none());
    assert!(record.expires_at.is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_create_keeps_expiry(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let expires_at = Utc::now() + Duration::days(1);

    let mut input = new_url("https://example.com/exp", "exp0001", None);
    input.expires_at = Some(expires_at);
    let record = repo.create(input).await.unwrap();

    // TIMESTAMPTZ keeps microseconds.
    let stored = record.expires_at.unwrap();
    assert!((stored - expires_at).num_milliseconds().abs() < 1);
    assert!(!record.is_expired());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_duplicate_short_code_conflicts(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(new_url("https://a.example", "dup0001", None))
        .await
        .unwrap();
    let result = repo
        .create(new_url("https://b.example", "dup0001", None))
        .await;

    assert!(matches!(result, Err(AppError::AliasConflict { .. })));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_duplicate_alias_conflicts(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(new_url("https://a.example", "promo01", Some("promo01")))
        .await
        .unwrap();
    let result = repo
        .create(new_url("https://b.example", "promo02", Some("promo01")))
        .await;

    match result {
        Err(AppError::AliasConflict { alias }) => assert_eq!(alias, "promo01"),
        other => panic!("expected alias conflict, got {other:?}"),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_find_by_code_matches_code_and_alias(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.create(new_url("https://example.com/x", "xcode01", Some("xalias01")))
        .await
        .unwrap();

    let by_code = repo.find_by_code("xcode01").await.unwrap();
    let by_alias = repo.find_by_code("xalias01").await.unwrap();
    let missing = repo.find_by_code("nothing").await.unwrap();

    assert_eq!(by_code.unwrap().original_url, "https://example.com/x");
    assert_eq!(by_alias.unwrap().short_code, "xcode01");
    assert!(missing.is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_find_by_id(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let created = repo
        .create(new_url("https://example.com/id", "byid001", None))
        .await
        .unwrap();

    let found = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.short_code, "byid001");
    assert!(repo.find_by_id(created.id + 1000).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_increment_clicks(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.create(new_url("https://example.com/c", "click01", Some("clicky01")))
        .await
        .unwrap();

    repo.increment_clicks("click01").await.unwrap();
    repo.increment_clicks("clicky01").await.unwrap();
    // Unknown codes are a no-op.
    repo.increment_clicks("unknown").await.unwrap();

    let record = repo.find_by_code("click01").await.unwrap().unwrap();
    assert_eq!(record.clicks, 2);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_delete(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.create(new_url("https://example.com/d", "del0001", None))
        .await
        .unwrap();

    assert!(repo.delete("del0001").await.unwrap());
    assert!(!repo.delete("del0001").await.unwrap());
    assert!(repo.find_by_code("del0001").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_ping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
