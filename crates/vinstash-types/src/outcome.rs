//! Outcome of a single vehicle import.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Structured result of importing one row set.
///
/// These are not errors: a fetch that produced too little data is a normal
/// outcome and is reported back to the caller as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The vehicle and its option names were persisted (or already present).
    #[display("Import complete")]
    Complete,
    /// The row set was empty.
    #[display("No data supplied")]
    NoData,
    /// One of the required fields was missing or empty.
    #[display("Insufficient data supplied")]
    InsufficientData,
}

impl ImportOutcome {
    /// Returns true if the import persisted a vehicle.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(ImportOutcome::Complete.to_string(), "Import complete");
        assert_eq!(ImportOutcome::NoData.to_string(), "No data supplied");
        assert_eq!(
            ImportOutcome::InsufficientData.to_string(),
            "Insufficient data supplied"
        );
    }

    #[test]
    fn test_outcome_is_complete() {
        assert!(ImportOutcome::Complete.is_complete());
        assert!(!ImportOutcome::NoData.is_complete());
        assert!(!ImportOutcome::InsufficientData.is_complete());
    }
}
