//! Repository and generator doubles for service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use snip_core::repository::Result;
use snip_core::{ReadRepository, RecordPage, Repository, ShortCode, StorageError, UrlRecord};
use snip_generator::CodeGenerator;
use snip_storage::InMemoryRepository;

/// Hands out the same code for every URL.
pub struct FixedCodeGenerator(pub ShortCode);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self, _long_url: &str) -> ShortCode {
        self.0.clone()
    }
}

/// Misses the first `stale_lookups` long-URL lookups, as a reader racing a
/// concurrent writer would.
pub struct StaleLookupRepository {
    inner: Arc<InMemoryRepository>,
    remaining: AtomicUsize,
}

impl StaleLookupRepository {
    pub fn new(inner: Arc<InMemoryRepository>, stale_lookups: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(stale_lookups),
        }
    }
}

#[async_trait]
impl ReadRepository for StaleLookupRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        let stale = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        self.inner.find_by_long_url(long_url).await
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.inner.find_by_short_code(code).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<RecordPage> {
        self.inner.list(offset, limit).await
    }
}

#[async_trait]
impl Repository for StaleLookupRepository {
    async fn save(&self, record: UrlRecord) -> Result<()> {
        self.inner.save(record).await
    }

    async fn increment_click(&self, code: &ShortCode) -> Result<()> {
        self.inner.increment_click(code).await
    }
}

/// Reads succeed, but every click increment fails.
pub struct BrokenCounterRepository {
    pub inner: Arc<InMemoryRepository>,
    pub attempts: AtomicUsize,
}

impl BrokenCounterRepository {
    pub fn new(inner: Arc<InMemoryRepository>) -> Self {
        Self {
            inner,
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReadRepository for BrokenCounterRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        self.inner.find_by_long_url(long_url).await
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.inner.find_by_short_code(code).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<RecordPage> {
        self.inner.list(offset, limit).await
    }
}

#[async_trait]
impl Repository for BrokenCounterRepository {
    async fn save(&self, record: UrlRecord) -> Result<()> {
        self.inner.save(record).await
    }

    async fn increment_click(&self, _code: &ShortCode) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Unavailable("connection refused".to_owned()))
    }
}

/// Every call fails as if the backend were down.
pub struct UnavailableRepository;

#[async_trait]
impl ReadRepository for UnavailableRepository {
    async fn find_by_long_url(&self, _long_url: &str) -> Result<Option<UrlRecord>> {
        Err(StorageError::Unavailable("connection refused".to_owned()))
    }

    async fn find_by_short_code(&self, _code: &ShortCode) -> Result<Option<UrlRecord>> {
        Err(StorageError::Unavailable("connection refused".to_owned()))
    }

    async fn list(&self, _offset: u64, _limit: u64) -> Result<RecordPage> {
        Err(StorageError::Timeout("list".to_owned()))
    }
}

#[async_trait]
impl Repository for UnavailableRepository {
    async fn save(&self, _record: UrlRecord) -> Result<()> {
        Err(StorageError::Unavailable("connection refused".to_owned()))
    }

    async fn increment_click(&self, _code: &ShortCode) -> Result<()> {
        Err(StorageError::Unavailable("connection refused".to_owned()))
    }
}

/// Rejects offsets and limits that do not fit a signed 64-bit bind, as the
/// PostgreSQL repository does.
pub struct SignedOffsetRepository(pub Arc<InMemoryRepository>);

#[async_trait]
impl ReadRepository for SignedOffsetRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        self.0.find_by_long_url(long_url).await
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.0.find_by_short_code(code).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<RecordPage> {
        if i64::try_from(offset).is_err() || i64::try_from(limit).is_err() {
            return Err(StorageError::Query(format!(
                "offset {offset} or limit {limit} is out of range"
            )));
        }
        self.0.list(offset, limit).await
    }
}
