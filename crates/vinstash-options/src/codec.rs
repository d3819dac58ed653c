//! Canonical encoding of option sets.

use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur while decoding an [`EncodedSet`].
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The text is not a JSON array of strings.
    #[error("Malformed option set '{encoded}': {source}")]
    Json {
        /// The offending encoded text.
        encoded: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The codes are not strictly ascending, so the text was not produced by [`encode`].
    #[error("Option set is not in canonical order: '{encoded}'")]
    NotCanonical {
        /// The offending encoded text.
        encoded: String,
    },
}

/// An option set in its canonical persisted form.
///
/// The text is a compact JSON array with codes sorted lexically and
/// deduplicated, e.g. `["5AC","8SR"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedSet(String);

impl EncodedSet {
    /// Wraps text read back from storage without validating it.
    ///
    /// Use [`decode`] to validate and recover the codes.
    #[must_use]
    pub const fn from_raw(encoded: String) -> Self {
        Self(encoded)
    }

    /// Returns the encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the set and returns the encoded text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EncodedSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedSet {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encodes option codes into their canonical form.
///
/// The result depends only on the set of codes, not on their order or
/// multiplicity in `codes`.
pub fn encode<I, S>(codes: I) -> EncodedSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sorted: BTreeSet<String> = codes
        .into_iter()
        .map(|code| code.as_ref().to_owned())
        .collect();

    let array = Value::Array(sorted.into_iter().map(Value::String).collect());
    EncodedSet(array.to_string())
}

/// Decodes an encoded option set.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of strings or if the
/// codes are not strictly ascending.
pub fn decode(encoded: &EncodedSet) -> Result<BTreeSet<String>, DecodeError> {
    let codes: Vec<String> =
        serde_json::from_str(encoded.as_str()).map_err(|source| DecodeError::Json {
            encoded: encoded.0.clone(),
            source,
        })?;

    if codes.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(DecodeError::NotCanonical {
            encoded: encoded.0.clone(),
        });
    }

    Ok(codes.into_iter().collect())
}
