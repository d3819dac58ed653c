//! Display utilities and output formatting for the vinstash CLI.

use anyhow::Result;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use vinstash_lib::VehicleRecord;

/// Output format for vehicle listings.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Table,
    Json,
}

/// Creates the import progress bar, counting percent.
pub(crate) fn import_progress_bar(quiet: bool, vins: usize) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message(format!("importing {vins} vehicles"));
    Ok(pb)
}

/// Prints vehicles in the given format.
pub(crate) fn print_vehicles(vehicles: &[VehicleRecord], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(vehicles)?),
        Format::Table => {
            if vehicles.is_empty() {
                println!("No vehicles found.");
                return Ok(());
            }

            println!(
                "{:<20} {:<10} {:<20} {:<20} {:<10} OPTIONS",
                "VIN", "TYPE", "COLOR", "UPHOLSTERY", "PRODUCED"
            );
            println!("{}", "-".repeat(100));

            for vehicle in vehicles {
                println!(
                    "{:<20} {:<10} {:<20} {:<20} {:<10} {}",
                    vehicle.vin,
                    vehicle.code_type,
                    vehicle.color,
                    vehicle.upholstery,
                    vehicle.production_date,
                    join_codes(vehicle),
                );
            }

            println!("\nTotal: {} vehicles", vehicles.len());
        }
    }
    Ok(())
}

/// Prints one vehicle with option names where known.
pub(crate) fn print_vehicle(vehicle: &VehicleRecord, names: &BTreeMap<String, String>) {
    println!("VIN:             {}", vehicle.vin);
    println!("Code / Type:     {}", vehicle.code_type);
    println!("Color:           {}", vehicle.color);
    println!("Upholstery:      {}", vehicle.upholstery);
    println!("Production Date: {}", vehicle.production_date);
    println!("\nOptions:");
    for code in &vehicle.options {
        let name = names.get(code).map_or("", String::as_str);
        println!("  {code:<5} {name}");
    }
}

/// Prints an option code to name mapping.
pub(crate) fn print_mapping(code_type: &str, mapping: &BTreeMap<String, String>) {
    if mapping.is_empty() {
        println!("No options known for {code_type}.");
        return;
    }

    println!("{:<6} NAME", "CODE");
    println!("{}", "-".repeat(50));
    for (code, name) in mapping {
        println!("{code:<6} {name}");
    }
    println!("\nTotal: {} options", mapping.len());
}

fn join_codes(vehicle: &VehicleRecord) -> String {
    vehicle
        .options
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
