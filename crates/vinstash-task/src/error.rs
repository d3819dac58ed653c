//! Coordinator errors.

use thiserror::Error;

/// Errors that can occur while managing the import worker.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The coordinator was created outside a tokio runtime.
    #[error("Import coordinator requires a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The worker task panicked or was aborted.
    #[error("Import worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for coordinator operations.
pub type Result<T> = std::result::Result<T, TaskError>;
