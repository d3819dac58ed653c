//! Error types for the vehicle store.

use std::path::PathBuf;
use thiserror::Error;
use vinstash_options::{DecodeError, PatternError};

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database reported an error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored option set could not be decoded.
    #[error("Corrupt vehicle row: {0}")]
    Decode(#[from] DecodeError),

    /// A search predicate could not be built.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Failed to create the database directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The database was written by a newer version.
    #[error("Unsupported schema version {found}, max supported {supported}")]
    UnsupportedSchemaVersion {
        /// Version found in the database.
        found: i64,
        /// Highest version this build understands.
        supported: i64,
    },

    /// A thread panicked while holding the connection.
    #[error("Store connection lock poisoned")]
    Poisoned,
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
