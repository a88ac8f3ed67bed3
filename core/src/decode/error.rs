//! Decode error classification

use serde_json::Value;
use thiserror::Error;

use super::FieldKind;

/// Structural decode failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The root handed to the decoder was not an object
    #[error("Invalid JSON: expected an object")]
    InvalidJson,

    /// A recognised key held a value of the wrong runtime type
    #[error("A JSON element was not of the correct type: `{field}` should be {expected}, got {node}")]
    IncorrectType {
        /// Key whose value was rejected
        field: &'static str,
        /// Kind the descriptor asked for
        expected: FieldKind,
        /// The offending node
        node: Value,
    },

    /// Keys named by the descriptor table were absent from the payload
    #[error("Not all expected entries were found (missing: {})", .missing.join(", "))]
    PartiallyParsed {
        /// Keys that were not found
        missing: Vec<&'static str>,
    },

    /// A string discriminator matched none of the switch entries
    #[error("No variant matches `{field}` = {value:?}")]
    SwitchNotMatched {
        /// Discriminator key
        field: &'static str,
        /// Value that was found
        value: String,
    },
}

/// A trusted payload did not have the shape the client expects.
///
/// Produced by [`super::force_decode`]; callers treat it as fatal.
#[derive(Debug, Error)]
#[error("server payload violated the `{record}` contract: {source} (payload: {excerpt})")]
pub struct ContractViolation {
    /// Record type that was being decoded
    pub record: &'static str,
    #[source]
    pub source: DecodeError,
    /// Leading part of the rejected payload
    pub excerpt: String,
}

/// Longest payload excerpt kept in a [`ContractViolation`]
pub(crate) const EXCERPT_LIMIT: usize = 200;

pub(crate) fn excerpt(tree: &Value) -> String {
    let mut text = tree.to_string();
    if text.len() > EXCERPT_LIMIT {
        let mut cut = EXCERPT_LIMIT;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push('…');
    }
    text
}
