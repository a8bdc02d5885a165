use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use std::fmt::Display;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Opaque identifier assigned to a record when it is created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlId(String);

impl UrlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UrlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: UrlId,
    /// The original URL that was shortened.
    pub long_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    /// How many times the short code has been resolved.
    pub click_count: u64,
    /// When the short code was last resolved; `None` if never.
    pub last_accessed_at: Option<Timestamp>,
}

impl UrlRecord {
    /// Builds a record that has never been accessed.
    pub fn new(
        id: UrlId,
        long_url: impl Into<String>,
        short_code: ShortCode,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            long_url: long_url.into(),
            short_code,
            created_at,
            click_count: 0,
            last_accessed_at: None,
        }
    }
}

/// One window of records plus the total number of stored records.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage {
    pub records: Vec<UrlRecord>,
    pub total_count: u64,
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing the listing service to work with read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record created for `long_url`, if any.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>>;

    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Returns up to `limit` records starting at `offset`, newest first,
    /// together with the total record count.
    async fn list(&self, offset: u64, limit: u64) -> Result<RecordPage>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Persists a new record. Returns `Err(Conflict)` if the id or the short
    /// code is already taken.
    async fn save(&self, record: UrlRecord) -> Result<()>;

    /// Atomically bumps `click_count` and stamps `last_accessed_at` with the
    /// current time. Unknown codes are a no-op, not an error.
    async fn increment_click(&self, code: &ShortCode) -> Result<()>;
}
