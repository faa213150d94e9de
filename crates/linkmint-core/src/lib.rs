//! Core types and traits for the linkmint URL shortener.
//!
//! This crate provides the domain model shared by the allocator, the
//! storage backends and the secondary index sinks.

pub mod error;
pub mod link;
pub mod shortcode;
pub mod sink;
pub mod store;

pub use error::{CoreError, SinkError, StorageError};
pub use link::{ClickLogEntry, Link, NewLink, SecondaryIndexRecord};
pub use shortcode::ShortCode;
pub use sink::IndexSink;
pub use store::LinkStore;
