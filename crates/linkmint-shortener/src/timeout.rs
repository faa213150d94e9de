use linkmint_core::{SinkError, StorageError};
use std::future::Future;
use std::time::Duration;

/// Error types that can represent an elapsed deadline.
pub(crate) trait Elapsed {
    fn elapsed(operation: &str, limit: Duration) -> Self;
}

impl Elapsed for StorageError {
    fn elapsed(operation: &str, limit: Duration) -> Self {
        StorageError::Timeout(format!("{operation} exceeded {limit:?}"))
    }
}

impl Elapsed for SinkError {
    fn elapsed(operation: &str, limit: Duration) -> Self {
        SinkError::Timeout(format!("{operation} exceeded {limit:?}"))
    }
}

/// Runs a store or sink call, failing with a timeout error after `limit`.
pub(crate) async fn bounded<T, E, F>(operation: &str, limit: Duration, call: F) -> Result<T, E>
where
    E: Elapsed,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(E::elapsed(operation, limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out() {
        let result: Result<(), StorageError> = bounded("find_by_url", Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(StorageError::Timeout(_))));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result: Result<u8, SinkError> =
            bounded("scan_links", Duration::from_secs(1), async { Ok(7) }).await;

        assert_eq!(result.unwrap(), 7);
    }
}
