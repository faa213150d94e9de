use async_trait::async_trait;
use linkmint_core::sink::Result;
use linkmint_core::{ClickLogEntry, IndexSink, SecondaryIndexRecord, ShortCode};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Default)]
struct Inner {
    links: Vec<SecondaryIndexRecord>,
    positions: HashMap<String, usize>,
    clicks: Vec<ClickLogEntry>,
}

/// An in-process sink keeping links in insertion order.
///
/// `put_link` on an already mirrored code overwrites the URL in place, which
/// matches the hash-field semantics of the Redis sink.
#[derive(Debug, Default)]
pub struct InMemoryIndexSink {
    inner: Mutex<Inner>,
}

impl InMemoryIndexSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mirrored links.
    pub fn link_count(&self) -> usize {
        self.inner.lock().links.len()
    }

    /// Number of recorded clicks.
    pub fn click_count(&self) -> usize {
        self.inner.lock().clicks.len()
    }
}

#[async_trait]
impl IndexSink for InMemoryIndexSink {
    async fn put_link(&self, code: &ShortCode, url: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        let record = SecondaryIndexRecord {
            short_code: code.to_string(),
            original_url: url.to_string(),
        };

        match inner.positions.get(code.as_str()).copied() {
            Some(position) => inner.links[position] = record,
            None => {
                let position = inner.links.len();
                inner.positions.insert(code.to_string(), position);
                inner.links.push(record);
            }
        }

        trace!(code = %code, "mirrored link in memory");
        Ok(())
    }

    async fn scan_links(&self) -> Result<Vec<SecondaryIndexRecord>> {
        Ok(self.inner.lock().links.clone())
    }

    async fn scan_clicks(&self) -> Result<Vec<ClickLogEntry>> {
        Ok(self.inner.lock().clicks.clone())
    }

    async fn record_click(&self, entry: &ClickLogEntry) -> Result<()> {
        self.inner.lock().clicks.push(entry.clone());
        Ok(())
    }
}
