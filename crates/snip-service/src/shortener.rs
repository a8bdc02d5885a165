use std::sync::Arc;

use jiff::Timestamp;
use snip_core::{validate_url, Repository, Shortened, ShortenerError, StorageError, UrlRecord};
use snip_generator::{CodeGenerator, DigestCodeGenerator, IdGenerator, MonotonicIdGenerator};
use tracing::{debug, error, info, warn};

/// Creates short codes for long URLs.
///
/// Creation is idempotent: a URL that was shortened before gets its
/// existing `{id, short_code}` back and no new record is written.
///
/// Codes are derived from the URL itself, so a `Conflict` from storage means
/// either a concurrent creation of the same URL (the existing record is
/// returned) or a code collision with a different URL (reported as
/// [`ShortenerError::CreationFailed`]). No collision retry is performed.
#[derive(Debug)]
pub struct ShortenerService<R, G = DigestCodeGenerator, I = MonotonicIdGenerator> {
    repository: Arc<R>,
    generator: G,
    ids: I,
}

impl<R: Repository> ShortenerService<R> {
    /// Creates a service using the SHA-256 code generator and monotonic ids.
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_generators(repository, DigestCodeGenerator, MonotonicIdGenerator::new())
    }
}

impl<R: Repository, G: CodeGenerator, I: IdGenerator> ShortenerService<R, G, I> {
    /// Creates a new `ShortenerService` with custom generators.
    pub fn with_generators(repository: Arc<R>, generator: G, ids: I) -> Self {
        Self {
            repository,
            generator,
            ids,
        }
    }

    pub async fn shorten(&self, long_url: &str) -> Result<Shortened, ShortenerError> {
        if let Err(err) = validate_url(long_url) {
            warn!(url = %long_url, error = %err, "rejected invalid url");
            return Err(err.into());
        }

        if let Some(existing) = self.find_existing(long_url).await? {
            debug!(url = %long_url, short_code = %existing.short_code, "url already shortened");
            return Ok(existing);
        }

        let record = UrlRecord::new(
            self.ids.next_id(),
            long_url,
            self.generator.generate(long_url),
            Timestamp::now(),
        );
        let shortened = Shortened::from(&record);

        match self.repository.save(record).await {
            Ok(()) => {
                info!(url_id = %shortened.id, short_code = %shortened.short_code, "created short url");
                Ok(shortened)
            }
            Err(StorageError::Conflict(reason)) => self.resolve_conflict(long_url, reason).await,
            Err(err) => {
                error!(url_id = %shortened.id, error = %err, "failed to save url");
                Err(err.into())
            }
        }
    }

    async fn find_existing(&self, long_url: &str) -> Result<Option<Shortened>, ShortenerError> {
        let existing = self
            .repository
            .find_by_long_url(long_url)
            .await
            .inspect_err(|err| error!(url = %long_url, error = %err, "failed to look up url"))?;
        Ok(existing.as_ref().map(Shortened::from))
    }

    /// Re-reads by long URL after a `Conflict`: a record for the same URL
    /// means another request created it first.
    async fn resolve_conflict(
        &self,
        long_url: &str,
        reason: String,
    ) -> Result<Shortened, ShortenerError> {
        match self.find_existing(long_url).await? {
            Some(existing) => {
                debug!(url = %long_url, short_code = %existing.short_code, "url created concurrently");
                Ok(existing)
            }
            None => {
                error!(url = %long_url, reason = %reason, "short code collision");
                Err(ShortenerError::CreationFailed(reason))
            }
        }
    }
}
