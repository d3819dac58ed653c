//! Search and show commands.

use crate::commands::open_store;
use crate::display::{Format, print_vehicle, print_vehicles};
use anyhow::{Context, Result, bail};
use std::path::Path;
use vinstash_lib::{VehicleQuery, is_option_code};

/// Search vehicles of `code_type` by required and forbidden option codes.
pub(crate) fn search(
    db: Option<&Path>,
    code_type: &str,
    include: Vec<String>,
    exclude: Vec<String>,
    format: Format,
) -> Result<()> {
    if let Some(code) = include.iter().chain(&exclude).find(|c| !is_option_code(c)) {
        bail!("Invalid option code: {code}. Option codes are 3 characters (e.g., 8SR)");
    }

    let store = open_store(db)?;
    let query = VehicleQuery::new(code_type).include(include).exclude(exclude);
    let vehicles = store
        .search_vehicles(&query)
        .context("Failed to search vehicles")?;

    print_vehicles(&vehicles, format)
}

/// Show a single vehicle.
pub(crate) fn show(db: Option<&Path>, vin: &str) -> Result<()> {
    let store = open_store(db)?;
    let vehicle = store
        .get_vehicle(vin)
        .context("Failed to load vehicle")?
        .with_context(|| format!("Vehicle not found: {vin}"))?;
    let names = store
        .get_option_mapping(&vehicle.code_type)
        .context("Failed to load option names")?;

    print_vehicle(&vehicle, &names);
    Ok(())
}
