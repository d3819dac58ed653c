//! SQLite-backed vehicle and option store for vinstash.
//!
//! - [`VehicleStore`] - Import, search, delete and metadata listing
//! - [`VehicleQuery`] - Search by code type and option inclusion/exclusion
//! - [`StoreError`] - Persistence and decoding failures

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod draft;
mod error;
mod query;
mod regexp;
mod store;

pub use error::{Result, StoreError};
pub use query::VehicleQuery;
pub use store::{DATABASE_FILE, SCHEMA_VERSION, VehicleStore};
