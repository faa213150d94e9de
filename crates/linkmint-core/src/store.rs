use crate::error::StorageError;
use crate::link::{Link, NewLink};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for link store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The authoritative store of links.
///
/// Implementations must make every operation appear atomic: a reader either
/// sees a fully created link or nothing. Uniqueness of short codes is enforced
/// here and is the only protection against two concurrent allocations picking
/// the same code.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Looks up the link for a normalized original URL.
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>>;

    /// Looks up the link for a short code.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>>;

    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Persists a new link, assigning its id and creation time.
    ///
    /// Returns `Err(CodeConflict)` if the code is taken and `Err(UrlConflict)`
    /// if the URL already has a link.
    async fn create(&self, link: NewLink) -> Result<Link>;

    /// Returns up to `limit` links, newest first.
    async fn list(&self, limit: usize) -> Result<Vec<Link>>;
}
