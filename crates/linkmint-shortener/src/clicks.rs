use crate::timeout::bounded;
use linkmint_core::{ClickLogEntry, IndexSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// Appends clicks to the sink without making the caller wait.
#[derive(Debug)]
pub struct ClickRecorder<K: ?Sized> {
    sink: Arc<K>,
    timeout: Duration,
}

impl<K: ?Sized> Clone for ClickRecorder<K> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            timeout: self.timeout,
        }
    }
}

impl<K: IndexSink + ?Sized> ClickRecorder<K> {
    pub fn new(sink: Arc<K>, timeout: Duration) -> Self {
        Self { sink, timeout }
    }

    /// Spawns the write and returns immediately. Failures are only logged.
    ///
    /// Must be called from within a tokio runtime.
    pub fn record(&self, entry: ClickLogEntry) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        let timeout = self.timeout;

        tokio::spawn(async move {
            match bounded("record_click", timeout, sink.record_click(&entry)).await {
                Ok(()) => trace!(code = ?entry.short_code, "recorded click"),
                Err(e) => warn!(code = ?entry.short_code, error = %e, "failed to record click"),
            }
        })
    }
}
