//! Vehicle search queries.

use std::collections::BTreeSet;
use vinstash_options::{OptionsPredicate, PatternError, exclusion_predicate, inclusion_predicate};

/// Search criteria for [`VehicleStore::search_vehicles`](crate::VehicleStore::search_vehicles).
///
/// Option codes are held in ordered sets, so the inclusion predicate always
/// receives its codes sorted. Empty sets apply no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleQuery {
    /// Exact code type to match.
    pub code_type: String,
    /// Codes every result must have.
    pub include: BTreeSet<String>,
    /// Codes no result may have.
    pub exclude: BTreeSet<String>,
}

impl VehicleQuery {
    /// Creates a query matching every vehicle of `code_type`.
    #[must_use]
    pub fn new(code_type: impl Into<String>) -> Self {
        Self {
            code_type: code_type.into(),
            ..Self::default()
        }
    }

    /// Requires the given option codes.
    #[must_use]
    pub fn include<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Forbids the given option codes.
    #[must_use]
    pub fn exclude<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Builds the inclusion predicate, if any codes are required.
    pub(crate) fn inclusion(&self) -> Result<Option<OptionsPredicate>, PatternError> {
        let required: Vec<&str> = self.include.iter().map(String::as_str).collect();
        inclusion_predicate(&required)
    }

    /// Builds the exclusion predicate, if any codes are forbidden.
    pub(crate) fn exclusion(&self) -> Result<Option<OptionsPredicate>, PatternError> {
        exclusion_predicate(&self.exclude)
    }
}
