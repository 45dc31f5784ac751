//! Errors raised while deciding whether a decoded save payload can be trusted.
//!
//! Validation stops at the first failing check, so a [`ValidationError`]
//! always describes exactly one field and one broken rule.

use serde_json::Number;
use thiserror::Error;

use crate::schema::FieldKind;

/// A payload rejected by [`crate::validate`] or [`crate::migrate`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("save data must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' has invalid type: expected {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: FieldKind,
        found: &'static str,
    },

    #[error("field '{field}' value {value} is below minimum {min}")]
    BelowMinimum {
        field: &'static str,
        value: Number,
        min: i64,
    },

    #[error("field '{field}' value {value} exceeds maximum {max}")]
    AboveMaximum {
        field: &'static str,
        value: Number,
        max: i64,
    },

    #[error("field '{field}' length {len} is below minimum {min}")]
    TooShort {
        field: &'static str,
        len: usize,
        min: usize,
    },

    #[error("field '{field}' length {len} exceeds maximum {max}")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("field '{field}' array length {len} exceeds maximum {max}")]
    TooManyItems {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("field '{field}' item {index} has invalid type: expected {expected}, found {found}")]
    ItemWrongType {
        field: &'static str,
        index: usize,
        expected: FieldKind,
        found: &'static str,
    },

    #[error("save data could not be decoded: {0}")]
    Decode(String),
}

impl ValidationError {
    /// Name of the offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::TooManyItems { field, .. }
            | Self::ItemWrongType { field, .. } => Some(field),
            Self::NotAnObject { .. } | Self::Decode(_) => None,
        }
    }
}
