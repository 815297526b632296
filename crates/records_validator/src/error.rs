//! Error types for validation operations.

use thiserror::Error;

/// Why a raw value could not be converted to a declared type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoercionError {
    /// The value's run-time type is not accepted for the declared type
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: &'static str,
    },

    /// A string was offered but does not parse as the declared type
    #[error("unable to parse string as {expected}: {reason}")]
    Unparsable { expected: String, reason: String },

    /// A native float is NaN or infinite
    #[error("expected a finite float, got {value}")]
    NonFinite { value: f64 },
}

impl CoercionError {
    /// Creates a new type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: &'static str) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual,
        }
    }

    /// Creates a new parse failure error.
    pub fn unparsable(expected: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unparsable {
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new non-finite float error.
    pub fn non_finite(value: f64) -> Self {
        Self::NonFinite { value }
    }
}
