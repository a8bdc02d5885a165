use std::sync::Arc;

use async_trait::async_trait;
use snip_core::{Expanded, Repository, Shortened, Shortener, ShortenerError, UrlPage};
use snip_generator::{CodeGenerator, DigestCodeGenerator, IdGenerator, MonotonicIdGenerator};

use crate::detached::DetachedTasks;
use crate::listing::ListingService;
use crate::resolver::ResolverService;
use crate::shortener::ShortenerService;

/// The three URL operations over one shared repository.
///
/// This is what transports hold, usually as `Arc<dyn Shortener>`.
#[derive(Debug)]
pub struct UrlService<R, G = DigestCodeGenerator, I = MonotonicIdGenerator> {
    shortener: ShortenerService<R, G, I>,
    resolver: ResolverService<R>,
    listing: ListingService<R>,
}

impl<R: Repository> UrlService<R> {
    pub fn new(repository: R, tasks: DetachedTasks) -> Self {
        let repository = Arc::new(repository);
        Self {
            shortener: ShortenerService::new(Arc::clone(&repository)),
            resolver: ResolverService::new(Arc::clone(&repository), tasks),
            listing: ListingService::new(repository),
        }
    }
}

#[async_trait]
impl<R: Repository, G: CodeGenerator, I: IdGenerator> Shortener for UrlService<R, G, I> {
    async fn shorten(&self, long_url: &str) -> Result<Shortened, ShortenerError> {
        self.shortener.shorten(long_url).await
    }

    async fn expand(&self, short_code: &str) -> Result<Expanded, ShortenerError> {
        self.resolver.expand(short_code).await
    }

    async fn list_urls(&self, page: i64, page_size: i64) -> Result<UrlPage, ShortenerError> {
        self.listing.list_urls(page, page_size).await
    }
}
