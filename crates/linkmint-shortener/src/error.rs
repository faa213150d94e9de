use linkmint_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AllocatorError>;

/// Errors surfaced to callers of the allocator.
///
/// Code conflicts and sink failures are handled inside the allocator and
/// never show up here.
#[derive(Debug, Clone, Error)]
pub enum AllocatorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no free short code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
    #[error("link store failure: {0}")]
    Storage(#[from] StorageError),
}
