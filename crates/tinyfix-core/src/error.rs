use thiserror::Error;

/// Errors related to validating the core domain types.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Returns `true` when the backend could not be reached or did not answer in time.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("corrupt mapping at '{key}': {reason}")]
    CorruptMapping { key: String, reason: String },
    #[error("gave up allocating a short code after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl ShortenerError {
    /// Returns `true` when the failure comes from an unreachable store.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_unavailable())
    }
}
