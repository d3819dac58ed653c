//! Info command implementation.

use crate::commands::open_store;
use anyhow::{Context, Result};
use std::path::Path;

/// Show the database location, schema version and contents summary.
pub(crate) fn show_info(db: Option<&Path>) -> Result<()> {
    let store = open_store(db)?;

    let path = store
        .path()
        .map_or_else(|| "(in memory)".to_owned(), |p| p.display().to_string());
    let version = store.schema_version().context("Failed to read schema version")?;
    let vehicles = store.count_vehicles().context("Failed to count vehicles")?;
    let code_types = store
        .list_code_types()
        .context("Failed to list code types")?;

    println!("Database:       {path}");
    println!("Schema Version: {version}");
    println!("Vehicles:       {vehicles}");
    println!("Code Types:     {}", code_types.len());

    Ok(())
}
