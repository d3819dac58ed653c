//! The fetcher contract.

use crate::{FetchEvent, FetchFailure, FetchStream};
use futures::StreamExt;
use futures::future;
use futures::stream;
use std::time::Duration;
use vinstash_types::RawRow;

/// Default number of checkpoints a fetcher yields per VIN.
pub const DEFAULT_CHECKPOINTS: u32 = 8;

/// Looks up one vehicle at a time.
///
/// Implementations model a slow, human-paced source and are driven
/// sequentially; they are never asked for two VINs at once.
pub trait VehicleFetcher: Send + Sync {
    /// Starts a lookup for `vin`.
    fn fetch(&self, vin: &str) -> FetchStream;

    /// Number of checkpoints a lookup is expected to yield before its rows.
    ///
    /// Used only to pace progress; a stream may yield fewer.
    fn checkpoints_per_item(&self) -> u32 {
        DEFAULT_CHECKPOINTS
    }
}

/// Builds a stream of `checkpoints` checkpoints, each preceded by
/// `step_delay`, that ends with `finish`.
pub fn paced_stream(
    checkpoints: u32,
    step_delay: Duration,
    finish: Result<Vec<RawRow>, FetchFailure>,
) -> FetchStream {
    let steps = stream::iter(0..checkpoints).then(move |_| async move {
        if !step_delay.is_zero() {
            tokio::time::sleep(step_delay).await;
        }
        Ok::<_, FetchFailure>(FetchEvent::Checkpoint)
    });

    let last = stream::once(future::ready(finish.map(FetchEvent::Rows)));

    steps.chain(last).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;

    #[tokio::test]
    async fn test_paced_stream_success() {
        let rows = vec![RawRow::new("VIN", "WBA123")];
        let events: Vec<_> = paced_stream(3, Duration::ZERO, Ok(rows.clone()))
            .collect()
            .await;

        assert_eq!(events.len(), 4);
        for event in &events[..3] {
            assert!(matches!(event, Ok(FetchEvent::Checkpoint)));
        }
        assert!(matches!(&events[3], Ok(FetchEvent::Rows(r)) if *r == rows));
    }

    #[tokio::test]
    async fn test_paced_stream_failure_is_last() {
        let events: Vec<_> = paced_stream(2, Duration::ZERO, Err(FetchError::not_found().into()))
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[2],
            Err(FetchFailure::Fetch(e)) if e.message() == "VIN not found."
        ));
    }

    #[tokio::test]
    async fn test_paced_stream_without_checkpoints() {
        let events: Vec<_> = paced_stream(0, Duration::ZERO, Ok(Vec::new()))
            .collect()
            .await;
        assert_eq!(events.len(), 1);
    }
}
