//! Background VIN import coordination for vinstash.
//!
//! - [`ImportCoordinator`] - Starts one import worker at a time and reports on it
//! - [`ImportJob`] - The VINs, results, and progress of one import
//! - [`TaskSlot`] / [`TaskState`] - The coordinator's single slot and its lifecycle
//! - [`ImportProgress`] - Thread-safe handle shared by the worker and the controller

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coordinator;
mod error;
mod job;
mod progress;

pub use coordinator::ImportCoordinator;
pub use error::{Result, TaskError};
pub use job::{GENERIC_ERROR, ImportJob, JobId, TaskState};
pub use progress::{ImportProgress, TaskSlot};
