use async_trait::async_trait;
use linkmint_core::sink::Result;
use linkmint_core::{ClickLogEntry, IndexSink, SecondaryIndexRecord, ShortCode, SinkError};
use redis::AsyncCommands;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

const SCAN_BATCH: usize = 500;

/// A Redis-backed implementation of [`IndexSink`].
///
/// Layout, relative to the key prefix:
/// - `links`: a hash of `short_code -> original_url`, read with `HSCAN`
/// - `clicks`: a list of JSON encoded [`ClickLogEntry`] values, appended with `RPUSH`
#[derive(Debug, Clone)]
pub struct RedisIndexSink {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> SinkError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        SinkError::Timeout(message)
    } else if err.is_io_error() {
        SinkError::Unavailable(message)
    } else {
        SinkError::Operation(message)
    }
}

impl RedisIndexSink {
    /// Creates a new Redis sink with the default `lm:` key prefix.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, "lm:")
    }

    /// Creates a new Redis sink with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::with_prefix(conn, key_prefix))
    }

    fn links_key(&self) -> String {
        format!("{}links", self.key_prefix)
    }

    fn clicks_key(&self) -> String {
        format!("{}clicks", self.key_prefix)
    }
}

#[async_trait]
impl IndexSink for RedisIndexSink {
    async fn put_link(&self, code: &ShortCode, url: &str) -> Result<()> {
        trace!(code = %code, "mirroring link to Redis");

        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(self.links_key(), code.as_str(), url)
            .await
            .map_err(|e| map_redis_error("failed to mirror link to Redis", e))?;

        debug!(code = %code, "mirrored link to Redis");
        Ok(())
    }

    async fn scan_links(&self) -> Result<Vec<SecondaryIndexRecord>> {
        let key = self.links_key();
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        loop {
            let (next, batch): (u64, Vec<(String, String)>) = redis::cmd("HSCAN")
                .arg(&key)
                .arg(cursor)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| map_redis_error("failed to scan links in Redis", e))?;

            // HSCAN may return a field more than once across iterations.
            for (short_code, original_url) in batch {
                if seen.insert(short_code.clone()) {
                    records.push(SecondaryIndexRecord {
                        short_code,
                        original_url,
                    });
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        trace!(count = records.len(), "scanned links from Redis");
        Ok(records)
    }

    async fn scan_clicks(&self) -> Result<Vec<ClickLogEntry>> {
        let key = self.clicks_key();
        let mut conn = self.conn.clone();
        let mut start: isize = 0;
        let mut entries = Vec::new();

        loop {
            let stop = start + SCAN_BATCH as isize - 1;
            let batch: Vec<String> = conn
                .lrange(&key, start, stop)
                .await
                .map_err(|e| map_redis_error("failed to read click log from Redis", e))?;
            let fetched = batch.len();

            for raw in batch {
                let entry = match serde_json::from_str::<ClickLogEntry>(&raw) {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(error = %e, "click entry is not a JSON object, keeping raw text");
                        ClickLogEntry::undecodable(raw)
                    }
                };
                entries.push(entry);
            }

            if fetched < SCAN_BATCH {
                break;
            }
            start += fetched as isize;
        }

        trace!(count = entries.len(), "scanned click log from Redis");
        Ok(entries)
    }

    async fn record_click(&self, entry: &ClickLogEntry) -> Result<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| SinkError::Serialization(format!("failed to encode click entry: {e}")))?;

        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(self.clicks_key(), json)
            .await
            .map_err(|e| map_redis_error("failed to append click to Redis", e))?;
        Ok(())
    }
}
