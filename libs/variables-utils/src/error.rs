//! Error types for value coercion.

use thiserror::Error;

/// Errors produced while encoding a variable value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VariablesError {
    /// Objects, arrays and nulls have no scalar string form.
    #[error("complex values are not allowed. {value} needs to be stringified")]
    UnsupportedValueKind { value: String },

    /// NaN and infinities have no JSON encoding.
    #[error("non-finite number {value} cannot be stringified")]
    NonFiniteNumber { value: f64 },
}

impl VariablesError {
    pub fn unsupported(value: impl Into<String>) -> Self {
        Self::UnsupportedValueKind {
            value: value.into(),
        }
    }
}
