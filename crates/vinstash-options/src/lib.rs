//! Canonical option-set encoding for vinstash.
//!
//! Option sets are stored in a plain text column, so set membership is
//! answered with pattern matching over a canonical encoding:
//!
//! - [`encode`] / [`decode`] - Canonical sorted JSON array form
//! - [`EncodedSet`] - The encoded text as persisted
//! - [`inclusion_predicate`] / [`exclusion_predicate`] - Regex predicates
//!   over an [`EncodedSet`]

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod predicate;

pub use codec::{DecodeError, EncodedSet, decode, encode};
pub use predicate::{
    OptionsPredicate, PatternError, PredicateKind, exclusion_predicate, inclusion_predicate,
};
