//! Disposable containers for backend integration tests.

pub mod error;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
