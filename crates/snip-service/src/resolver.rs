use std::sync::Arc;

use snip_core::{Expanded, Repository, ShortCode, ShortenerError};
use tracing::{debug, error, info_span};

use crate::detached::DetachedTasks;

/// Resolves short codes back to their long URLs.
///
/// Every successful resolution is counted by a detached task: the caller
/// gets the values read before the increment and never waits for, or hears
/// about, the write.
#[derive(Debug)]
pub struct ResolverService<R> {
    repository: Arc<R>,
    tasks: DetachedTasks,
}

impl<R: Repository> ResolverService<R> {
    pub fn new(repository: Arc<R>, tasks: DetachedTasks) -> Self {
        Self { repository, tasks }
    }

    pub async fn expand(&self, short_code: &str) -> Result<Expanded, ShortenerError> {
        let code = ShortCode::new(short_code)?;

        let record = self
            .repository
            .find_by_short_code(&code)
            .await
            .inspect_err(|err| error!(short_code = %code, error = %err, "failed to look up short code"))?
            .ok_or_else(|| {
                debug!(short_code = %code, "short code not found");
                ShortenerError::NotFound(code.to_string())
            })?;

        let expanded = Expanded {
            long_url: record.long_url,
            click_count: record.click_count,
            created_at: record.created_at,
        };
        self.count_click(code);

        Ok(expanded)
    }

    fn count_click(&self, code: ShortCode) {
        let repository = Arc::clone(&self.repository);
        let span = info_span!("increment_click", short_code = %code);
        self.tasks.spawn("increment_click", span, async move {
            repository.increment_click(&code).await
        });
    }
}
