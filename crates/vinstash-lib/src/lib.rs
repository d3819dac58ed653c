//! VIN option store with a background import coordinator.
//!
//! This is a facade crate that re-exports functionality from the vinstash
//! workspace crates and adds [`VinStash`], the controller-facing API.
//!
//! # Quick Start
//!
//! ```ignore
//! use vinstash_lib::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(VehicleStore::with_default_path()?);
//!     let stash = VinStash::new(store, Arc::new(FixtureFetcher::new("fixtures")))?;
//!
//!     stash.start_import(["WBA123"]);
//!     stash.wait().await?;
//!     for line in stash.consume_results().unwrap_or_default() {
//!         println!("{line}");
//!     }
//!
//!     for vehicle in stash.search("E90", &["403"], &["8SR"])? {
//!         println!("{}", vehicle.vin);
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(feature = "task")]
mod controller;
mod error;

pub use error::{Error, Result};

// Re-export core types
pub use vinstash_types::*;

// Re-export the options codec
pub use vinstash_options::{
    DecodeError, EncodedSet, OptionsPredicate, PatternError, PredicateKind, decode, encode,
    exclusion_predicate, inclusion_predicate,
};

// Re-export the store
pub use vinstash_store::{DATABASE_FILE, SCHEMA_VERSION, StoreError, VehicleQuery, VehicleStore};

// Re-export the fetch contract
pub use vinstash_fetch::{
    DEFAULT_CHECKPOINTS, FetchError, FetchEvent, FetchFailure, FetchStream, FetcherConfig,
    FixtureFetcher, VehicleFetcher, paced_stream,
};

// Re-export the coordinator
#[cfg(feature = "task")]
pub use controller::VinStash;

#[cfg(feature = "task")]
pub use vinstash_task::{
    GENERIC_ERROR, ImportCoordinator, ImportJob, ImportProgress, JobId, TaskError, TaskSlot,
    TaskState,
};

/// Prelude module for convenient imports.
///
/// ```
/// use vinstash_lib::prelude::*;
/// ```
pub mod prelude {
    pub use vinstash_types::{ImportOutcome, RawRow, VehicleRecord};

    pub use vinstash_options::{EncodedSet, decode, encode};

    pub use vinstash_store::{VehicleQuery, VehicleStore};

    pub use vinstash_fetch::{FetcherConfig, FixtureFetcher, VehicleFetcher};

    #[cfg(feature = "task")]
    pub use crate::VinStash;

    #[cfg(feature = "task")]
    pub use vinstash_task::{ImportCoordinator, TaskState};
}
