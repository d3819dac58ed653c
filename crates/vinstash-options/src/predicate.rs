//! Pattern predicates over encoded option sets.
//!
//! A predicate is a regular expression evaluated against the text of an
//! [`EncodedSet`]. Each code is matched together with its JSON quotes so a
//! code never matches inside a longer one.

use crate::EncodedSet;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Fragment matching the content between two codes of an encoded set.
const GAP: &str = r"[\d\D]+";

/// Error building a predicate pattern.
#[derive(Error, Debug)]
#[error("Invalid option pattern: {0}")]
pub struct PatternError(#[from] regex::Error);

/// Whether a predicate requires or forbids its codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// Matches when every code is present.
    Include,
    /// Matches when no code is present.
    Exclude,
}

/// A compiled predicate over an [`EncodedSet`].
///
/// For [`PredicateKind::Exclude`] the pattern matches sets that contain a
/// forbidden code, and the predicate is its negation. Storage backends
/// should apply it as `NOT column REGEXP pattern`.
#[derive(Debug, Clone)]
pub struct OptionsPredicate {
    kind: PredicateKind,
    regex: Regex,
}

impl OptionsPredicate {
    fn new(kind: PredicateKind, pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            kind,
            regex: Regex::new(pattern)?,
        })
    }

    /// Returns the predicate kind.
    #[must_use]
    pub const fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// Returns true if the pattern must be negated when applied.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        matches!(self.kind, PredicateKind::Exclude)
    }

    /// Returns the regular expression text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Evaluates the predicate against an encoded set.
    #[must_use]
    pub fn matches(&self, encoded: &EncodedSet) -> bool {
        self.regex.is_match(encoded.as_str()) != self.is_negated()
    }
}

/// Returns the escaped pattern for one code as it appears in an encoded set.
fn quoted_code(code: &str) -> String {
    regex::escape(&Value::String(code.to_owned()).to_string())
}

/// Builds a predicate matching sets that contain every code in `required`.
///
/// The codes are matched as an ordered subsequence of the encoded set.
/// **`required` must be sorted lexically**: an unsorted slice produces a
/// predicate that does not match sets which contain all of its codes.
/// Callers holding a `BTreeSet` satisfy this by iterating it.
///
/// Returns `None` when `required` is empty.
///
/// # Errors
///
/// Returns an error if the resulting pattern cannot be compiled.
pub fn inclusion_predicate<S: AsRef<str>>(
    required: &[S],
) -> Result<Option<OptionsPredicate>, PatternError> {
    if required.is_empty() {
        return Ok(None);
    }

    let pattern = required
        .iter()
        .map(|code| quoted_code(code.as_ref()))
        .collect::<Vec<_>>()
        .join(GAP);

    OptionsPredicate::new(PredicateKind::Include, &pattern).map(Some)
}

/// Builds a predicate matching sets that contain none of `forbidden`.
///
/// Order of `forbidden` does not matter. Returns `None` when it is empty.
///
/// # Errors
///
/// Returns an error if the resulting pattern cannot be compiled.
pub fn exclusion_predicate<I, S>(forbidden: I) -> Result<Option<OptionsPredicate>, PatternError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let alternatives: Vec<String> = forbidden
        .into_iter()
        .map(|code| quoted_code(code.as_ref()))
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    OptionsPredicate::new(PredicateKind::Exclude, &alternatives.join("|")).map(Some)
}
