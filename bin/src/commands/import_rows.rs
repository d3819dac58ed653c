//! Manual import of a single row file.

use crate::commands::open_store;
use anyhow::{Context, Result};
use std::path::Path;
use vinstash_lib::{RawRow, labels};

/// Import one vehicle from a JSON file of `[key, value]` pairs.
pub(crate) fn import_rows(db: Option<&Path>, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let rows: Vec<RawRow> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rows from {}", file.display()))?;

    let store = open_store(db)?;
    let outcome = store.import_vehicle(&rows).context("Failed to import vehicle")?;

    let vin = rows
        .iter()
        .rev()
        .find(|row| row.key == labels::VIN)
        .map_or("<unknown>", |row| row.value.as_str());
    println!("{vin}: {outcome}");

    Ok(())
}
