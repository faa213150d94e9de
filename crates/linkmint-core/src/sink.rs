use crate::error::SinkError;
use crate::link::{ClickLogEntry, SecondaryIndexRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;

/// A best-effort, eventually consistent mirror of links plus the click log.
///
/// The sink is never authoritative. Writes may be lost and scans may lag
/// behind the link store.
#[async_trait]
pub trait IndexSink: Send + Sync + 'static {
    /// Mirrors a `code -> url` pair. Overwrites any previous value for `code`.
    async fn put_link(&self, code: &ShortCode, url: &str) -> Result<()>;

    /// Returns every mirrored link in scan order.
    async fn scan_links(&self) -> Result<Vec<SecondaryIndexRecord>>;

    /// Returns every click entry in scan order.
    async fn scan_clicks(&self) -> Result<Vec<ClickLogEntry>>;

    /// Appends a click entry to the click log.
    async fn record_click(&self, entry: &ClickLogEntry) -> Result<()>;
}
