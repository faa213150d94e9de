//! Secondary index sinks.
//!
//! A sink mirrors `code -> url` pairs and stores the click log for analytics.
//! It is never the source of truth; see [`IndexSink`].

pub mod memory;
pub mod noop;
pub mod redis;

pub use crate::redis::RedisIndexSink;
pub use linkmint_core::sink::Result;
pub use linkmint_core::{IndexSink, SinkError};
pub use memory::InMemoryIndexSink;
pub use noop::NoopIndexSink;
