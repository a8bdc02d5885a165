pub mod clock;
pub mod digest;
pub mod id;

pub use clock::{Clock, SystemClock};
pub use digest::DigestCodeGenerator;
pub use id::MonotonicIdGenerator;

use snip_core::{ShortCode, UrlId};

/// Trait for deriving short codes from long URLs.
///
/// Implementations are pure: they don't interact with storage, and the same
/// input must always produce the same code so that creation stays idempotent.
pub trait CodeGenerator: Send + Sync + 'static {
    fn generate(&self, long_url: &str) -> ShortCode;
}

/// Trait for minting record identifiers.
///
/// Every call must return an id that was never returned before by this
/// instance.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> UrlId;
}
