//! Persisted vehicle record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A vehicle as stored: scalar attributes plus an unordered option set.
///
/// `options` is a [`BTreeSet`] so it always iterates in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Vehicle identification number, the primary key.
    pub vin: String,
    /// Model code and type; the option namespace this vehicle belongs to.
    pub code_type: String,
    /// Exterior color.
    pub color: String,
    /// Interior upholstery.
    pub upholstery: String,
    /// Production date as reported by the source.
    pub production_date: String,
    /// Option codes fitted to this vehicle.
    pub options: BTreeSet<String>,
}

impl VehicleRecord {
    /// Returns true if every scalar field and the option set are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.vin,
            &self.code_type,
            &self.color,
            &self.upholstery,
            &self.production_date,
        ]
        .iter()
        .all(|field| !field.is_empty())
            && !self.options.is_empty()
    }

    /// Returns true if the vehicle has the given option code.
    #[must_use]
    pub fn has_option(&self, code: &str) -> bool {
        self.options.contains(code)
    }
}
