//! CLI command implementations.

pub(crate) mod delete;
pub(crate) mod import;
pub(crate) mod import_rows;
pub(crate) mod info;
pub(crate) mod options;
pub(crate) mod search;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use vinstash_lib::VehicleStore;

/// Opens the store at `db`, or at the default location.
pub(crate) fn open_store(db: Option<&Path>) -> Result<VehicleStore> {
    debug!(db = ?db, "opening database");
    match db {
        Some(path) => VehicleStore::open(path)
            .with_context(|| format!("Failed to open database {}", path.display())),
        None => VehicleStore::with_default_path().with_context(|| {
            format!(
                "Failed to open database {}",
                VehicleStore::default_path().display()
            )
        }),
    }
}
