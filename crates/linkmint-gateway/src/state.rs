use std::sync::Arc;

use linkmint_core::IndexSink;
use linkmint_shortener::{AnalyticsAggregator, ClickRecorder, Shortener};

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    analytics: Arc<AnalyticsAggregator<dyn IndexSink>>,
    clicks: ClickRecorder<dyn IndexSink>,
    base_url: String,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        analytics: Arc<AnalyticsAggregator<dyn IndexSink>>,
        clicks: ClickRecorder<dyn IndexSink>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            analytics,
            clicks,
            base_url: public_base_url.into(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn analytics(&self) -> &AnalyticsAggregator<dyn IndexSink> {
        &self.analytics
    }

    pub fn clicks(&self) -> &ClickRecorder<dyn IndexSink> {
        &self.clicks
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
