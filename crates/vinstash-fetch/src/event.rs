//! Events and failures produced while fetching one vehicle.

use futures::stream::BoxStream;
use thiserror::Error;
use vinstash_types::RawRow;

/// One step of a vehicle lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// A content-free progress checkpoint.
    Checkpoint,
    /// The extracted rows. Always the last event of a successful fetch.
    Rows(Vec<RawRow>),
}

/// A recognized lookup failure with a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    /// Creates a fetch error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error reported when the source has no record of the VIN.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new("VIN not found.")
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Any failure ending a fetch stream.
#[derive(Error, Debug)]
pub enum FetchFailure {
    /// A recognized failure whose message is meaningful to the user.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Anything else that went wrong inside the fetcher.
    #[error("Unstructured fetch failure: {0}")]
    Unstructured(Box<dyn std::error::Error + Send + Sync>),
}

impl FetchFailure {
    /// Wraps an arbitrary error as an unstructured failure.
    pub fn unstructured(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unstructured(error.into())
    }
}

/// Stream of events for one VIN.
///
/// A well-behaved stream yields checkpoints followed by exactly one
/// [`FetchEvent::Rows`], or ends with an error.
pub type FetchStream = BoxStream<'static, Result<FetchEvent, FetchFailure>>;
