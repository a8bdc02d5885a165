use crate::repository::{UrlId, UrlRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Outcome of shortening a long URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub id: UrlId,
    pub short_code: ShortCode,
}

impl From<&UrlRecord> for Shortened {
    fn from(record: &UrlRecord) -> Self {
        Self {
            id: record.id.clone(),
            short_code: record.short_code.clone(),
        }
    }
}

/// Outcome of resolving a short code.
///
/// `click_count` is the value read before this resolution was counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Expanded {
    pub long_url: String,
    pub click_count: u64,
    pub created_at: Timestamp,
}

/// A page request after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamps raw caller input: `page < 1` becomes 1, `page_size < 1` becomes
    /// [`DEFAULT_PAGE_SIZE`], and `page_size` is capped at [`MAX_PAGE_SIZE`].
    pub fn normalize(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    /// Rows to skip, capped at `i64::MAX` so any page stays addressable by
    /// storage backends with signed offsets.
    pub fn offset(&self) -> u64 {
        ((self.page - 1) as u64)
            .saturating_mul(self.page_size as u64)
            .min(i64::MAX as u64)
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

/// A page of records as returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPage {
    pub records: Vec<UrlRecord>,
    pub total_count: u64,
    pub page: i64,
    pub page_size: i64,
}

/// The operations exposed to transports.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens `long_url`, returning the existing mapping if one exists.
    async fn shorten(&self, long_url: &str) -> Result<Shortened>;

    /// Resolves a short code and counts the access in the background.
    async fn expand(&self, short_code: &str) -> Result<Expanded>;

    /// Lists stored records, newest first.
    async fn list_urls(&self, page: i64, page_size: i64) -> Result<UrlPage>;
}
