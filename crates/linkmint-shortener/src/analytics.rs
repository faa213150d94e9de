use crate::timeout::bounded;
use linkmint_core::{ClickLogEntry, IndexSink, SecondaryIndexRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bucket for click entries that carry no short code.
pub const UNKNOWN_CODE_BUCKET: &str = "unknown";

/// Links mirrored in the sink plus their clicks grouped by short code.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub links: Vec<SecondaryIndexRecord>,
    pub clicks_by_code: BTreeMap<String, Vec<ClickLogEntry>>,
}

/// Groups click entries by short code, preserving their relative order.
///
/// Entries without a usable code are kept under [`UNKNOWN_CODE_BUCKET`].
pub fn group_clicks(
    entries: impl IntoIterator<Item = ClickLogEntry>,
) -> BTreeMap<String, Vec<ClickLogEntry>> {
    let mut groups: BTreeMap<String, Vec<ClickLogEntry>> = BTreeMap::new();
    for entry in entries {
        let key = entry.code().unwrap_or(UNKNOWN_CODE_BUCKET).to_string();
        groups.entry(key).or_default().push(entry);
    }
    groups
}

/// Reads the secondary index and builds [`Analytics`].
///
/// The link scan and the click scan are independent: when one of them fails
/// the other half is still returned and the failed half is empty.
#[derive(Debug)]
pub struct AnalyticsAggregator<K: ?Sized> {
    sink: Arc<K>,
    scan_timeout: Duration,
}

impl<K: IndexSink + ?Sized> AnalyticsAggregator<K> {
    pub fn new(sink: Arc<K>, scan_timeout: Duration) -> Self {
        Self { sink, scan_timeout }
    }

    pub async fn aggregate(&self) -> Analytics {
        let (links, clicks) = tokio::join!(
            bounded("scan_links", self.scan_timeout, self.sink.scan_links()),
            bounded("scan_clicks", self.scan_timeout, self.sink.scan_clicks()),
        );

        let links = links.unwrap_or_else(|e| {
            warn!(error = %e, "link scan failed, returning no links");
            Vec::new()
        });

        let clicks = clicks.unwrap_or_else(|e| {
            warn!(error = %e, "click scan failed, returning no clicks");
            Vec::new()
        });

        debug!(
            links = links.len(),
            clicks = clicks.len(),
            "aggregated secondary index"
        );

        Analytics {
            links,
            clicks_by_code: group_clicks(clicks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linkmint_core::{ShortCode, SinkError};
    use linkmint_sink::InMemoryIndexSink;
    use serde_json::json;

    /// A sink over an in-memory one where either scan can be made to fail.
    struct PartialSink {
        inner: InMemoryIndexSink,
        fail_links: bool,
        fail_clicks: bool,
    }

    #[async_trait]
    impl IndexSink for PartialSink {
        async fn put_link(&self, code: &ShortCode, url: &str) -> linkmint_core::sink::Result<()> {
            self.inner.put_link(code, url).await
        }

        async fn scan_links(&self) -> linkmint_core::sink::Result<Vec<SecondaryIndexRecord>> {
            if self.fail_links {
                return Err(SinkError::Unavailable("links table offline".to_string()));
            }
            self.inner.scan_links().await
        }

        async fn scan_clicks(&self) -> linkmint_core::sink::Result<Vec<ClickLogEntry>> {
            if self.fail_clicks {
                return Err(SinkError::Timeout("click log scan".to_string()));
            }
            self.inner.scan_clicks().await
        }

        async fn record_click(&self, entry: &ClickLogEntry) -> linkmint_core::sink::Result<()> {
            self.inner.record_click(entry).await
        }
    }

    struct StuckClicksSink {
        inner: InMemoryIndexSink,
    }

    #[async_trait]
    impl IndexSink for StuckClicksSink {
        async fn put_link(&self, code: &ShortCode, url: &str) -> linkmint_core::sink::Result<()> {
            self.inner.put_link(code, url).await
        }

        async fn scan_links(&self) -> linkmint_core::sink::Result<Vec<SecondaryIndexRecord>> {
            self.inner.scan_links().await
        }

        async fn scan_clicks(&self) -> linkmint_core::sink::Result<Vec<ClickLogEntry>> {
            std::future::pending().await
        }

        async fn record_click(&self, entry: &ClickLogEntry) -> linkmint_core::sink::Result<()> {
            self.inner.record_click(entry).await
        }
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn click(code: Option<&str>, n: u64) -> ClickLogEntry {
        ClickLogEntry {
            short_code: code.map(str::to_string),
            timestamp: None,
            ..Default::default()
        }
        .with_metadata("n", n)
    }

    async fn seeded(fail_links: bool, fail_clicks: bool) -> PartialSink {
        let inner = InMemoryIndexSink::new();
        inner.put_link(&code("aaa111"), "https://a.example/").await.unwrap();
        inner.put_link(&code("bbb222"), "https://b.example/").await.unwrap();
        for entry in [
            click(Some("aaa111"), 1),
            click(Some("bbb222"), 2),
            click(None, 3),
            click(Some("aaa111"), 4),
        ] {
            inner.record_click(&entry).await.unwrap();
        }

        PartialSink {
            inner,
            fail_links,
            fail_clicks,
        }
    }

    #[test]
    fn groups_by_code_in_scan_order() {
        let groups = group_clicks(vec![
            click(Some("aaa111"), 1),
            click(Some("bbb222"), 2),
            click(Some("aaa111"), 3),
        ]);

        assert_eq!(groups.len(), 2);
        let order: Vec<&serde_json::Value> =
            groups["aaa111"].iter().map(|c| &c.metadata["n"]).collect();
        assert_eq!(order, vec![&json!(1), &json!(3)]);
        assert_eq!(groups["bbb222"].len(), 1);
    }

    #[test]
    fn missing_codes_land_in_unknown_bucket() {
        let mut blank = click(None, 2);
        blank.short_code = Some(String::new());

        let groups = group_clicks(vec![click(None, 1), blank, click(Some("aaa111"), 3)]);

        assert_eq!(groups[UNKNOWN_CODE_BUCKET].len(), 2);
        assert_eq!(groups["aaa111"].len(), 1);
    }

    #[test]
    fn loosely_shaped_log_items_are_grouped_not_dropped() {
        let raw = [
            r#"{"short_code":"abc123","timestamp":1700000000}"#,
            r#"{"short_code":"abc123","timestamp":"2024-01-01 10:00:00"}"#,
            r#"{"short_code":42}"#,
            r#"{"timestamp":"soon","ip":"10.0.0.1"}"#,
        ];
        let entries = raw
            .iter()
            .map(|item| serde_json::from_str::<ClickLogEntry>(item).unwrap());

        let groups = group_clicks(entries);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["abc123"].len(), 2);
        assert!(groups["abc123"].iter().all(|c| c.timestamp.is_some()));
        assert_eq!(groups[UNKNOWN_CODE_BUCKET].len(), 2);
        assert_eq!(groups[UNKNOWN_CODE_BUCKET][1].metadata["timestamp"], "soon");
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert!(group_clicks(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn aggregates_links_and_clicks() {
        let aggregator =
            AnalyticsAggregator::new(Arc::new(seeded(false, false).await), Duration::from_secs(1));

        let analytics = aggregator.aggregate().await;

        assert_eq!(analytics.links.len(), 2);
        assert_eq!(analytics.clicks_by_code["aaa111"].len(), 2);
        assert_eq!(analytics.clicks_by_code["bbb222"].len(), 1);
        assert_eq!(analytics.clicks_by_code[UNKNOWN_CODE_BUCKET].len(), 1);
    }

    #[tokio::test]
    async fn failed_click_scan_keeps_links() {
        let aggregator =
            AnalyticsAggregator::new(Arc::new(seeded(false, true).await), Duration::from_secs(1));

        let analytics = aggregator.aggregate().await;

        assert_eq!(analytics.links.len(), 2);
        assert!(analytics.clicks_by_code.is_empty());
    }

    #[tokio::test]
    async fn failed_link_scan_keeps_clicks() {
        let aggregator =
            AnalyticsAggregator::new(Arc::new(seeded(true, false).await), Duration::from_secs(1));

        let analytics = aggregator.aggregate().await;

        assert!(analytics.links.is_empty());
        assert_eq!(analytics.clicks_by_code.len(), 3);
    }

    #[tokio::test]
    async fn both_scans_failing_yields_empty_analytics() {
        let aggregator =
            AnalyticsAggregator::new(Arc::new(seeded(true, true).await), Duration::from_secs(1));

        assert_eq!(aggregator.aggregate().await, Analytics::default());
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_click_scan_times_out() {
        let inner = InMemoryIndexSink::new();
        inner.put_link(&code("aaa111"), "https://a.example/").await.unwrap();
        let aggregator =
            AnalyticsAggregator::new(Arc::new(StuckClicksSink { inner }), Duration::from_secs(2));

        let analytics = aggregator.aggregate().await;

        assert_eq!(analytics.links.len(), 1);
        assert!(analytics.clicks_by_code.is_empty());
    }

    #[test]
    fn serializes_as_links_and_clicks_by_code() {
        let analytics = Analytics {
            links: vec![SecondaryIndexRecord {
                short_code: "aaa111".to_string(),
                original_url: "https://a.example/".to_string(),
            }],
            clicks_by_code: group_clicks(vec![click(Some("aaa111"), 1)]),
        };

        let value = serde_json::to_value(&analytics).unwrap();
        assert_eq!(
            value,
            json!({
                "links": [{"short_code": "aaa111", "original_url": "https://a.example/"}],
                "clicks_by_code": {"aaa111": [{"short_code": "aaa111", "n": 1}]}
            })
        );
    }
}
