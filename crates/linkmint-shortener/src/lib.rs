//! Link allocation and analytics.
//!
//! [`LinkAllocator`] turns original URLs into short links against an
//! authoritative [`LinkStore`](linkmint_core::LinkStore) and mirrors new links
//! into a best-effort [`IndexSink`](linkmint_core::IndexSink).
//! [`AnalyticsAggregator`] reads the sink back and groups clicks per code.

pub mod allocator;
pub mod analytics;
pub mod clicks;
pub mod error;
pub mod shortener;
mod timeout;
pub mod url;

pub use allocator::{Allocation, AllocationOutcome, AllocatorConfig, LinkAllocator};
pub use analytics::{group_clicks, Analytics, AnalyticsAggregator, UNKNOWN_CODE_BUCKET};
pub use clicks::ClickRecorder;
pub use error::AllocatorError;
pub use shortener::Shortener;
