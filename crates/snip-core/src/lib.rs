//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the domain types, the repository contract, URL
//! validation, and the [`Shortener`] trait shared by the services and the
//! transports built on top of them.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;
pub mod validate;

pub use error::{CoreError, ShortenerError, StorageError, ValidationError};
pub use repository::{ReadRepository, RecordPage, Repository, UrlId, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::{Expanded, PageRequest, Shortened, Shortener, UrlPage};
pub use validate::validate_url;
