//! Outcome of validating one record.

use crate::{Record, ValidationError, ValidationErrors};
use serde_json::json;

/// Accept/reject outcome of one validation call.
///
/// Owned by the caller; holds no reference back to the schema that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Every field validated and every record validator passed
    Accepted(Record),
    /// One or more errors were found
    Rejected(ValidationErrors),
}

impl ValidationResult {
    /// Returns true if the record was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    /// Returns the validated record, if accepted.
    pub fn record(&self) -> Option<&Record> {
        match self {
            ValidationResult::Accepted(record) => Some(record),
            ValidationResult::Rejected(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            ValidationResult::Accepted(record) => Some(record),
            ValidationResult::Rejected(_) => None,
        }
    }

    /// Returns the errors in report order; empty if accepted.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Accepted(_) => &[],
            ValidationResult::Rejected(errors) => errors.as_slice(),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<Record, ValidationErrors> {
        match self {
            ValidationResult::Accepted(record) => Ok(record),
            ValidationResult::Rejected(errors) => Err(errors),
        }
    }

    /// Renders a human-readable report, one line per error.
    ///
    /// Empty when the record was accepted.
    pub fn report(&self) -> String {
        match self {
            ValidationResult::Accepted(_) => String::new(),
            ValidationResult::Rejected(errors) => errors.report(),
        }
    }

    /// Renders a machine-readable report.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ValidationResult::Accepted(record) => json!({
                "valid": true,
                "record": record,
            }),
            ValidationResult::Rejected(errors) => json!({
                "valid": false,
                "errors": errors,
                "summary": {
                    "error_count": errors.len(),
                }
            }),
        }
    }
}

impl From<Result<Record, ValidationErrors>> for ValidationResult {
    fn from(result: Result<Record, ValidationErrors>) -> Self {
        match result {
            Ok(record) => ValidationResult::Accepted(record),
            Err(errors) => ValidationResult::Rejected(errors),
        }
    }
}
