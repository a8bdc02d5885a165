use std::sync::Arc;

use snip_core::{PageRequest, ReadRepository, ShortenerError, UrlPage};
use tracing::{debug, error};

/// Pages through stored records, newest first.
#[derive(Debug)]
pub struct ListingService<R> {
    repository: Arc<R>,
}

impl<R: ReadRepository> ListingService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Out-of-range input is clamped, never rejected; the page actually
    /// served is echoed back in the result.
    pub async fn list_urls(&self, page: i64, page_size: i64) -> Result<UrlPage, ShortenerError> {
        let request = PageRequest::normalize(page, page_size);

        let found = self
            .repository
            .list(request.offset(), request.limit())
            .await
            .inspect_err(|err| error!(page = request.page, error = %err, "failed to list urls"))?;

        debug!(
            page = request.page,
            page_size = request.page_size,
            returned = found.records.len(),
            total = found.total_count,
            "listed urls"
        );

        Ok(UrlPage {
            records: found.records,
            total_count: found.total_count,
            page: request.page,
            page_size: request.page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SignedOffsetRepository, UnavailableRepository};
    use jiff::{SignedDuration, Timestamp};
    use snip_core::{Repository, ShortCode, StorageError, UrlId, UrlRecord};
    use snip_storage::InMemoryRepository;

    async fn seeded(count: i64) -> Arc<InMemoryRepository> {
        let repo = Arc::new(InMemoryRepository::new());
        let base = Timestamp::from_second(1_700_000_000).unwrap();
        for i in 0..count {
            repo.save(UrlRecord::new(
                UrlId::new(format!("url_{i}")),
                format!("https://example.com/{i}"),
                ShortCode::new_unchecked(format!("code{i}")),
                base + SignedDuration::from_secs(i),
            ))
            .await
            .unwrap();
        }
        repo
    }

    fn codes(page: &UrlPage) -> Vec<&str> {
        page.records.iter().map(|r| r.short_code.as_str()).collect()
    }

    #[tokio::test]
    async fn zero_input_uses_defaults() {
        let listing = ListingService::new(seeded(15).await);

        let defaulted = listing.list_urls(0, 0).await.unwrap();
        let explicit = listing.list_urls(1, 10).await.unwrap();

        assert_eq!(defaulted, explicit);
        assert_eq!(defaulted.page, 1);
        assert_eq!(defaulted.page_size, 10);
        assert_eq!(defaulted.records.len(), 10);
        assert_eq!(defaulted.total_count, 15);
    }

    #[tokio::test]
    async fn page_size_is_capped_at_one_hundred() {
        let listing = ListingService::new(seeded(120).await);

        let page = listing.list_urls(1, 500).await.unwrap();

        assert_eq!(page.page_size, 100);
        assert_eq!(page.records.len(), 100);
        assert_eq!(page.total_count, 120);
    }

    #[tokio::test]
    async fn pages_are_newest_first_and_disjoint() {
        let listing = ListingService::new(seeded(5).await);

        let first = listing.list_urls(1, 2).await.unwrap();
        let second = listing.list_urls(2, 2).await.unwrap();
        let third = listing.list_urls(3, 2).await.unwrap();

        assert_eq!(codes(&first), ["code4", "code3"]);
        assert_eq!(codes(&second), ["code2", "code1"]);
        assert_eq!(codes(&third), ["code0"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_total() {
        let listing = ListingService::new(seeded(3).await);

        let page = listing.list_urls(7, 10).await.unwrap();

        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page, 7);
    }

    #[tokio::test]
    async fn largest_page_number_lists_nothing() {
        let listing = ListingService::new(Arc::new(SignedOffsetRepository(seeded(3).await)));

        for page_size in [1, 10, 100] {
            let page = listing.list_urls(i64::MAX, page_size).await.unwrap();

            assert!(page.records.is_empty());
            assert_eq!(page.total_count, 3);
            assert_eq!(page.page, i64::MAX);
            assert_eq!(page.page_size, page_size);
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let listing = ListingService::new(Arc::new(InMemoryRepository::new()));

        let page = listing.list_urls(1, 10).await.unwrap();

        assert!(page.records.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let listing = ListingService::new(Arc::new(UnavailableRepository));

        let err = listing.list_urls(1, 10).await.unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Timeout(_))
        ));
    }
}
