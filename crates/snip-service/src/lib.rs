//! URL shortener services.
//!
//! [`UrlService`] bundles the create, resolve and list operations over one
//! repository and implements [`snip_core::Shortener`] for the transports.
//! Click counting runs on [`DetachedTasks`], which the binaries drain on
//! shutdown.

pub mod bootstrap;
pub mod detached;
pub mod listing;
pub mod resolver;
pub mod service;
pub mod shortener;
pub mod signal;

#[cfg(test)]
mod testing;

pub use bootstrap::{build_shortener, BootstrapError, StorageArgs, StorageBackend};
pub use detached::DetachedTasks;
pub use listing::ListingService;
pub use resolver::ResolverService;
pub use service::UrlService;
pub use shortener::ShortenerService;
pub use signal::shutdown_signal;
