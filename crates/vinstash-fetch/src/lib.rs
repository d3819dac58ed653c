//! Vehicle lookup contract for vinstash.
//!
//! - [`VehicleFetcher`] - Produces a [`FetchStream`] for one VIN
//! - [`FetchEvent`] - A progress checkpoint or the final rows
//! - [`FetchError`] / [`FetchFailure`] - Recognized and unstructured failures
//! - [`paced_stream`] - Builds a stream with a fixed number of checkpoints
//! - [`FixtureFetcher`] - Serves rows from JSON files on disk

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod event;
mod fetcher;
mod fixture;

pub use event::{FetchError, FetchEvent, FetchFailure, FetchStream};
pub use fetcher::{DEFAULT_CHECKPOINTS, VehicleFetcher, paced_stream};
pub use fixture::{FetcherConfig, FixtureFetcher};
