use thiserror::Error;

/// Errors related to the core functionality of the URL shortener service.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Reasons a candidate long URL is rejected before any storage work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL cannot be empty")]
    Empty,
    #[error("invalid URL format")]
    Malformed,
    #[error("URL must use http or https scheme")]
    UnsupportedScheme,
    #[error("URL must have a valid host")]
    MissingHost,
    #[error("URL exceeds maximum length of {max} characters", max = crate::validate::MAX_URL_LENGTH)]
    TooLong,
    #[error("URL must contain more than just the scheme")]
    SchemeOnly,
}

/// Failures reported by a repository implementation.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors surfaced by the shorten / expand / list operations.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] ValidationError),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("failed to create short url: {0}")]
    CreationFailed(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ShortenerError {
    /// Whether the error was caused by the caller's input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ShortenerError::InvalidUrl(_) | ShortenerError::InvalidShortCode(_)
        )
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}
