//! Extraction of a vehicle from raw lookup rows.

use std::collections::BTreeMap;
use vinstash_options::{EncodedSet, encode};
use vinstash_types::{RawRow, is_option_code, labels};

/// Vehicle fields gathered from one row set, before validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct VehicleDraft {
    pub(crate) vin: String,
    pub(crate) code_type: String,
    pub(crate) color: String,
    pub(crate) upholstery: String,
    pub(crate) production_date: String,
    /// Option code to display name. A repeated code keeps its last name.
    pub(crate) option_names: BTreeMap<String, String>,
}

impl VehicleDraft {
    /// Collects fields from rows. Labels win over the option-code shape.
    pub(crate) fn from_rows(rows: &[RawRow]) -> Self {
        let mut draft = Self::default();

        for row in rows {
            let value = row.value.clone();
            match row.key.as_str() {
                labels::VIN => draft.vin = value,
                labels::CODE_TYPE => draft.code_type = value,
                labels::COLOR => draft.color = value,
                labels::UPHOLSTERY => draft.upholstery = value,
                labels::PRODUCTION_DATE => draft.production_date = value,
                key if is_option_code(key) => {
                    draft.option_names.insert(key.to_owned(), value);
                }
                _ => {}
            }
        }

        draft
    }

    /// Returns the names of any empty required fields.
    pub(crate) fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = [
            (labels::VIN, &self.vin),
            (labels::CODE_TYPE, &self.code_type),
            (labels::COLOR, &self.color),
            (labels::UPHOLSTERY, &self.upholstery),
            (labels::PRODUCTION_DATE, &self.production_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| label)
        .collect();

        if self.option_names.is_empty() {
            missing.push("options");
        }
        missing
    }

    pub(crate) fn encoded_options(&self) -> EncodedSet {
        encode(self.option_names.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, &str)]) -> Vec<RawRow> {
        pairs.iter().map(|(k, v)| RawRow::new(*k, *v)).collect()
    }

    #[test]
    fn test_extracts_labels_and_options() {
        let draft = VehicleDraft::from_rows(&rows(&[
            ("VIN", "WBA123"),
            ("Code / Type", "E90"),
            ("Color", "Blue"),
            ("Upholstery", "Leather"),
            ("Production Date", "2006-01"),
            ("8SR", "Premium Package"),
            ("5AC", "High-beam assistant"),
            ("Engine", "N52"),
        ]));

        assert_eq!(draft.vin, "WBA123");
        assert_eq!(draft.code_type, "E90");
        assert_eq!(draft.color, "Blue");
        assert_eq!(draft.upholstery, "Leather");
        assert_eq!(draft.production_date, "2006-01");
        assert_eq!(draft.option_names.len(), 2);
        assert_eq!(draft.option_names["8SR"], "Premium Package");
        assert!(draft.missing_fields().is_empty());
        assert_eq!(draft.encoded_options().as_str(), r#"["5AC","8SR"]"#);
    }

    #[test]
    fn test_vin_label_is_not_an_option() {
        let draft = VehicleDraft::from_rows(&rows(&[("VIN", "WBA123")]));
        assert_eq!(draft.vin, "WBA123");
        assert!(draft.option_names.is_empty());
    }

    #[test]
    fn test_repeated_option_keeps_last_name() {
        let draft = VehicleDraft::from_rows(&rows(&[("8SR", "First"), ("8SR", "Second")]));
        assert_eq!(draft.option_names.len(), 1);
        assert_eq!(draft.option_names["8SR"], "Second");
    }

    #[test]
    fn test_missing_fields() {
        let draft = VehicleDraft::from_rows(&rows(&[
            ("VIN", "WBA123"),
            ("Code / Type", "E90"),
            ("Color", ""),
            ("Production Date", "2006-01"),
        ]));

        assert_eq!(
            draft.missing_fields(),
            vec!["Color", "Upholstery", "options"]
        );
    }
}
