use async_trait::async_trait;
use linkmint_core::sink::Result;
use linkmint_core::{ClickLogEntry, IndexSink, SecondaryIndexRecord, ShortCode};

/// A sink that accepts every write and stores nothing.
///
/// Used when no secondary store is configured; analytics then come back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIndexSink;

#[async_trait]
impl IndexSink for NoopIndexSink {
    async fn put_link(&self, _code: &ShortCode, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn scan_links(&self) -> Result<Vec<SecondaryIndexRecord>> {
        Ok(Vec::new())
    }

    async fn scan_clicks(&self) -> Result<Vec<ClickLogEntry>> {
        Ok(Vec::new())
    }

    async fn record_click(&self, _entry: &ClickLogEntry) -> Result<()> {
        Ok(())
    }
}
