//! Runs against a throwaway PostgreSQL container; needs a Docker daemon.
//! `cargo test -p snip-storage -- --ignored`

use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use snip_core::{ShortCode, UrlId, UrlRecord};
use snip_storage::{PgRepository, PoolSettings, ReadRepository, Repository, StorageError};
use snip_test_infra::postgres::{PostgresConfig, PostgresServer};

struct Fixture {
    _postgres: PostgresServer,
    repo: PgRepository,
}

impl Fixture {
    async fn start() -> Self {
        let postgres = PostgresServer::new(PostgresConfig::builder().build())
            .await
            .expect("start postgres");
        let url = postgres.database_url().await.expect("postgres url");
        let repo = connect_with_retry(&url).await;

        repo.migrate().await.expect("run migrations");

        Self {
            _postgres: postgres,
            repo,
        }
    }
}

async fn connect_with_retry(url: &str) -> PgRepository {
    let settings = PoolSettings::builder().max_connections(5).min_connections(0).build();
    let mut last_error = None;

    for _ in 0..20 {
        match PgRepository::connect(url, &settings).await {
            Ok(repo) => return repo,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect postgres: {last_error:?}");
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

fn record(id: &str, url: &str, short_code: &str, created_at: Timestamp) -> UrlRecord {
    UrlRecord::new(UrlId::new(id), url, code(short_code), created_at)
}

/// Microsecond precision, matching what the schema stores.
fn now_micros() -> Timestamp {
    Timestamp::from_microsecond(Timestamp::now().as_microsecond()).unwrap()
}

#[tokio::test]
#[ignore = "requires docker"]
async fn save_and_find_by_both_keys() {
    let fixture = Fixture::start().await;
    let saved = record("url_1", "https://example.com", "abc123", now_micros());

    fixture.repo.save(saved.clone()).await.unwrap();

    let by_code = fixture.repo.find_by_short_code(&code("abc123")).await.unwrap();
    assert_eq!(by_code, Some(saved.clone()));

    let by_url = fixture
        .repo
        .find_by_long_url("https://example.com")
        .await
        .unwrap();
    assert_eq!(by_url, Some(saved));

    assert!(fixture
        .repo
        .find_by_short_code(&code("missing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn save_conflicts_on_duplicate_short_code_or_id() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .save(record("url_1", "https://one.example", "abc123", now_micros()))
        .await
        .unwrap();

    let err = fixture
        .repo
        .save(record("url_2", "https://two.example", "abc123", now_micros()))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));

    let err = fixture
        .repo
        .save(record("url_1", "https://three.example", "zzz999", now_micros()))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn increment_click_is_atomic_and_stamps_access_time() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .save(record("url_1", "https://example.com", "abc123", now_micros()))
        .await
        .unwrap();

    let before = now_micros();
    let mut handles = Vec::new();
    for _ in 0..20 {
        let repo = fixture.repo.clone();
        handles.push(tokio::spawn(async move {
            repo.increment_click(&code("abc123")).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stored = fixture
        .repo
        .find_by_short_code(&code("abc123"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.click_count, 20);
    assert!(stored.last_accessed_at.is_some_and(|ts| ts >= before));

    // unknown codes are silently ignored
    fixture.repo.increment_click(&code("missing")).await.unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
async fn list_orders_newest_first_and_counts_everything() {
    let fixture = Fixture::start().await;
    let base = now_micros();

    for i in 0..5 {
        fixture
            .repo
            .save(record(
                &format!("url_{i}"),
                &format!("https://example.com/{i}"),
                &format!("code{i}"),
                base + SignedDuration::from_secs(i),
            ))
            .await
            .unwrap();
    }

    let first = fixture.repo.list(0, 2).await.unwrap();
    assert_eq!(first.total_count, 5);
    let codes: Vec<_> = first.records.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, ["code4", "code3"]);

    let second = fixture.repo.list(2, 2).await.unwrap();
    let codes: Vec<_> = second.records.iter().map(|r| r.short_code.as_str()).collect();
    assert_eq!(codes, ["code2", "code1"]);

    let beyond = fixture.repo.list(10, 2).await.unwrap();
    assert!(beyond.records.is_empty());
    assert_eq!(beyond.total_count, 5);

    let last = fixture.repo.list(i64::MAX as u64, 2).await.unwrap();
    assert!(last.records.is_empty());
    assert_eq!(last.total_count, 5);
}
