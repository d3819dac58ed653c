//! Core types for the vinstash vehicle option store.
//!
//! This crate provides the data structures shared across vinstash:
//!
//! - [`RawRow`] - A single key/value row extracted from a vehicle lookup
//! - [`VehicleRecord`] - A persisted vehicle with its option set
//! - [`ImportOutcome`] - Structured result of importing one row set
//! - [`labels`] - Fixed row labels for the scalar vehicle attributes

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod outcome;
mod row;
mod vehicle;

pub use outcome::ImportOutcome;
pub use row::{OPTION_CODE_LEN, RawRow, is_option_code, labels};
pub use vehicle::VehicleRecord;
