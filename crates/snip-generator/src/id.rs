use crate::clock::{Clock, SystemClock};
use crate::IdGenerator;
use snip_core::UrlId;
use std::sync::atomic::{AtomicU64, Ordering};

pub const ID_PREFIX: &str = "url_";

/// Record id generator producing `url_<unix nanoseconds>`.
///
/// Ids are strictly increasing within one instance: if the clock has not
/// advanced past the last issued value (or went backwards), the previous
/// value plus one is used instead.
///
/// For multi-process deployments the storage layer still rejects a
/// duplicate id as a conflict.
#[derive(Debug)]
pub struct MonotonicIdGenerator<C = SystemClock> {
    clock: C,
    last: AtomicU64,
}

impl MonotonicIdGenerator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MonotonicIdGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MonotonicIdGenerator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    fn next_value(&self) -> u64 {
        let now = u64::try_from(self.clock.now().as_nanosecond()).unwrap_or(0);
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            // the closure always returns `Some`
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

impl<C: Clock + 'static> IdGenerator for MonotonicIdGenerator<C> {
    fn next_id(&self) -> UrlId {
        UrlId::new(format!("{}{}", ID_PREFIX, self.next_value()))
    }
}
