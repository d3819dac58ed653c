//! Raw key/value rows as produced by a vehicle lookup.

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Length of an option code key (e.g. `8SR`).
pub const OPTION_CODE_LEN: usize = 3;

/// Row labels for the scalar vehicle attributes.
pub mod labels {
    /// Vehicle identification number.
    pub const VIN: &str = "VIN";
    /// Model code and type, used as the option namespace.
    pub const CODE_TYPE: &str = "Code / Type";
    /// Exterior color.
    pub const COLOR: &str = "Color";
    /// Interior upholstery.
    pub const UPHOLSTERY: &str = "Upholstery";
    /// Production date as reported by the source.
    pub const PRODUCTION_DATE: &str = "Production Date";

    /// All scalar labels, in the order they are checked.
    pub const ALL: [&str; 5] = [VIN, CODE_TYPE, COLOR, UPHOLSTERY, PRODUCTION_DATE];
}

/// A single `(key, value)` row extracted from a lookup result table.
///
/// Serialized as a two element array so fixture files can be written as
/// `[["VIN", "WBA123"], ["8SR", "Premium Package"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct RawRow {
    /// Row label (attribute name or option code).
    pub key: String,
    /// Row value (attribute value or option display name).
    pub value: String,
}

impl RawRow {
    /// Creates a new row.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns true if the key is one of the fixed scalar labels.
    #[must_use]
    pub fn is_label(&self) -> bool {
        labels::ALL.contains(&self.key.as_str())
    }
}

impl From<RawRow> for (String, String) {
    fn from(row: RawRow) -> Self {
        (row.key, row.value)
    }
}

/// Returns true if `key` has the shape of an option code.
///
/// An option code is exactly [`OPTION_CODE_LEN`] word characters (letters,
/// digits or underscore). Note that the `VIN` label also has this shape;
/// callers must check labels first.
#[must_use]
pub fn is_option_code(key: &str) -> bool {
    key.chars().count() == OPTION_CODE_LEN && key.chars().all(|c| c.is_alphanumeric() || c == '_')
}
