use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors raised by the authoritative link store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    CodeConflict(String),
    #[error("url already shortened: {0}")]
    UrlConflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Whether the error reports a uniqueness violation rather than a failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::CodeConflict(_) | Self::UrlConflict(_))
    }
}

/// Errors raised by a secondary index sink.
///
/// These never cross the allocator boundary; callers log and drop them.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("sink backend unavailable: {0}")]
    Unavailable(String),
    #[error("sink operation timed out: {0}")]
    Timeout(String),
    #[error("sink serialization failed: {0}")]
    Serialization(String),
    #[error("sink operation failed: {0}")]
    Operation(String),
}
