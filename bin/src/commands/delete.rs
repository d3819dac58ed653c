//! Delete command implementation.

use crate::commands::open_store;
use anyhow::{Context, Result};
use inquire::Confirm;
use std::path::Path;

/// Delete the given vehicles after confirmation.
pub(crate) fn delete(db: Option<&Path>, vins: &[String], yes: bool) -> Result<()> {
    let store = open_store(db)?;

    if !yes {
        let confirmed = Confirm::new(&format!("Delete {} vehicle(s)?", vins.len()))
            .with_default(false)
            .with_help_message(&vins.join(", "))
            .prompt()
            .context("Deletion cancelled")?;
        if !confirmed {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    let deleted = store
        .delete_vehicles(vins)
        .context("Failed to delete vehicles")?;
    println!("Deleted {deleted} of {} vehicles.", vins.len());

    Ok(())
}
