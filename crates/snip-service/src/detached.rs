use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{error, Instrument, Span};

/// Fire-and-forget work that must outlive the request that started it.
///
/// Tasks are spawned on the tokio runtime, so dropping or cancelling the
/// caller's future does not cancel them. A failed task is logged inside its
/// span and otherwise ignored: it is never retried and never reported to the
/// caller.
///
/// The tracker counts tasks in flight so shutdown (and tests) can wait for
/// them with [`DetachedTasks::drain`].
#[derive(Debug, Clone, Default)]
pub struct DetachedTasks {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Decrements the in-flight counter even if the task panics.
struct InFlightGuard(Arc<Inner>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl DetachedTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` in `span`. If it fails, the error is logged as
    /// `"<operation> failed"`.
    pub fn spawn<F, E>(&self, operation: &'static str, span: Span, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(Arc::clone(&self.inner));

        tokio::spawn(
            async move {
                let _guard = guard;
                if let Err(err) = task.await {
                    error!(operation, error = %err, "detached task failed");
                }
            }
            .instrument(span),
        );
    }

    /// Number of spawned tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Waits until no task is in flight.
    pub async fn drain(&self) {
        loop {
            // registered before the check so a concurrent wake-up is not lost
            let idle = self.inner.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Like [`drain`](Self::drain) but gives up after `timeout`.
    /// Returns `true` if every task finished in time.
    pub async fn drain_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.drain()).await.is_ok()
    }
}
