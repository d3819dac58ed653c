//! Top-level error type.

use thiserror::Error;
use vinstash_store::StoreError;

/// Errors returned by the controller-facing API.
#[derive(Error, Debug)]
pub enum Error {
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The import coordinator failed.
    #[cfg(feature = "task")]
    #[error(transparent)]
    Task(#[from] vinstash_task::TaskError),
}

/// Result type for the controller-facing API.
pub type Result<T> = std::result::Result<T, Error>;
