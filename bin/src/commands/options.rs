//! Option metadata commands.

use crate::commands::open_store;
use crate::display::print_mapping;
use anyhow::{Context, Result};
use std::path::Path;

/// Show the option names recorded for `code_type`.
pub(crate) fn show_options(db: Option<&Path>, code_type: &str) -> Result<()> {
    let store = open_store(db)?;
    let mapping = store
        .get_option_mapping(code_type)
        .context("Failed to load option names")?;

    print_mapping(code_type, &mapping);
    Ok(())
}

/// List every stored code type.
pub(crate) fn list_code_types(db: Option<&Path>) -> Result<()> {
    let store = open_store(db)?;
    let code_types = store
        .list_code_types()
        .context("Failed to list code types")?;

    if code_types.is_empty() {
        println!("No vehicles stored.");
        return Ok(());
    }

    for code_type in &code_types {
        println!("{code_type}");
    }
    Ok(())
}
