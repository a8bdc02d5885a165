use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::repository::Result;
use snip_core::{
    ReadRepository, RecordPage, Repository, ShortCode, StorageError, UrlId, UrlRecord,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::debug;
use typed_builder::TypedBuilder;

const SELECT_COLUMNS: &str =
    "SELECT id, long_url, short_code, created_at, click_count, last_accessed_at FROM urls";

/// Connection pool settings for [`PgRepository::connect`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct PoolSettings {
    #[builder(default = 10)]
    max_connections: u32,
    #[builder(default = 2)]
    min_connections: u32,
    #[builder(default = Duration::from_secs(5))]
    acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// PostgreSQL implementation of the repository contract.
///
/// Timestamps are stored as microseconds since the Unix epoch. Uniqueness of
/// `id` and `short_code` is enforced by the schema; a violation surfaces as
/// [`StorageError::Conflict`].
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<UrlRecord>> {
        let query = format!("{SELECT_COLUMNS} WHERE {column} = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

fn timestamp_from_micros(column: &str, value: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(value).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{value}': {e}"))
    })
}

fn record_from_row(row: &PgRow) -> Result<UrlRecord> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let click_count: i64 = row.try_get("click_count").map_err(map_sqlx_error)?;
    let last_accessed_at: Option<i64> = row
        .try_get("last_accessed_at")
        .map_err(map_sqlx_error)?;

    Ok(UrlRecord {
        id: UrlId::new(id),
        long_url,
        short_code: ShortCode::new_unchecked(short_code),
        created_at: timestamp_from_micros("created_at", created_at)?,
        click_count: u64::try_from(click_count).map_err(|_| {
            StorageError::InvalidData(format!("negative click_count {click_count}"))
        })?,
        last_accessed_at: last_accessed_at
            .map(|value| timestamp_from_micros("last_accessed_at", value))
            .transpose()?,
    })
}

fn to_i64(name: &str, value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| StorageError::Query(format!("{name} {value} is out of range")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for PgRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        self.find_one("long_url", long_url).await
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.find_one("short_code", code.as_str()).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<RecordPage> {
        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let query =
            format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2");
        let rows = sqlx::query(&query)
            .bind(to_i64("limit", limit)?)
            .bind(to_i64("offset", offset)?)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordPage {
            records,
            total_count: u64::try_from(total_count).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn save(&self, record: UrlRecord) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO urls (id, long_url, short_code, created_at, click_count, last_accessed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.long_url.as_str())
        .bind(record.short_code.as_str())
        .bind(record.created_at.as_microsecond())
        .bind(to_i64("click_count", record.click_count)?)
        .bind(record.last_accessed_at.map(|ts| ts.as_microsecond()))
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                let constraint = err
                    .as_database_error()
                    .and_then(|db| db.constraint())
                    .unwrap_or("unique")
                    .to_owned();
                return Err(StorageError::Conflict(format!(
                    "{constraint}: id {} / short code {}",
                    record.id, record.short_code
                )));
            }
            Err(err) => return Err(map_sqlx_error(err)),
        }

        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn increment_click(&self, code: &ShortCode) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE urls
            SET click_count = click_count + 1,
                last_accessed_at = $1
            WHERE short_code = $2
            "#,
        )
        .bind(Timestamp::now().as_microsecond())
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            debug!(code = %code, "no record matched click increment");
        }

        Ok(())
    }
}
