//! Error types for schema definition and record validation.
//!
//! Two families live here. [`SchemaDefinitionError`] is raised while a schema is
//! being built and never during validation. [`ValidationError`] describes one
//! problem found in one input record; they are collected into
//! [`ValidationErrors`] rather than thrown individually.

use crate::Value;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for schema definition operations.
pub type Result<T> = std::result::Result<T, SchemaDefinitionError>;

/// Path label used in reports for errors that concern the whole record.
pub const ROOT_PATH: &str = "__root__";

/// Errors detected while defining a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDefinitionError {
    /// Two fields share a name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// Type name not in the closed set
    #[error("Unknown field type: {0}")]
    UnknownType(String),

    /// `optional<optional<T>>`
    #[error("Field '{0}' nests optional types")]
    NestedOptional(String),

    /// Constraint declared on a type it cannot apply to
    #[error("Constraint '{constraint}' is not applicable to field '{field}' of type {field_type}")]
    IncompatibleConstraint {
        /// Field name
        field: String,
        /// Constraint name
        constraint: String,
        /// Declared field type
        field_type: String,
    },

    /// Pattern failed to compile
    #[error("Invalid regex pattern for field '{field}': {error}")]
    InvalidPattern {
        /// Field name
        field: String,
        /// Compiler message
        error: String,
    },

    /// Bounds that no value can satisfy
    #[error("Invalid bounds for field '{field}': {message}")]
    InvalidBounds {
        /// Field name
        field: String,
        /// Description of the conflict
        message: String,
    },

    /// Literal default rejected by its own field
    #[error("Invalid default for field '{field}': {message}")]
    InvalidDefault {
        /// Field name
        field: String,
        /// Why the default was rejected
        message: String,
    },

    /// Validator registered against a field the schema does not declare
    #[error("Validator registered for unknown field '{0}'")]
    UnknownField(String),
}

/// Category of a single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Required field absent from input
    #[serde(rename = "missing")]
    Missing,
    /// Value could not be converted to the declared type
    #[serde(rename = "coercion_error")]
    Coercion,
    /// Numeric or temporal bound violated
    #[serde(rename = "range_error")]
    Range,
    /// String length bound violated
    #[serde(rename = "length_error")]
    Length,
    /// String did not match the declared pattern
    #[serde(rename = "pattern_error")]
    Pattern,
    /// Field-level custom validator rejected the value
    #[serde(rename = "custom_validation_error")]
    Custom,
    /// Whole-record validator rejected the record
    #[serde(rename = "cross_field_error")]
    CrossField,
    /// Input key not declared by a schema that forbids extras
    #[serde(rename = "extra_forbidden")]
    Extra,
}

impl ErrorKind {
    /// Returns the stable snake-case code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "missing",
            ErrorKind::Coercion => "coercion_error",
            ErrorKind::Range => "range_error",
            ErrorKind::Length => "length_error",
            ErrorKind::Pattern => "pattern_error",
            ErrorKind::Custom => "custom_validation_error",
            ErrorKind::CrossField => "cross_field_error",
            ErrorKind::Extra => "extra_forbidden",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One failed constraint, coercion or validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Field path; empty for whole-record errors
    pub field: String,
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
    /// The offending value
    pub input: Value,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        field: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
        input: Value,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
            input,
        }
    }

    /// Creates a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, ErrorKind::Missing, "field required", Value::Null)
    }

    /// Creates a coercion error.
    pub fn coercion(field: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self::new(field, ErrorKind::Coercion, message, input)
    }

    /// Creates a range error.
    pub fn range(field: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self::new(field, ErrorKind::Range, message, input)
    }

    /// Creates a length error.
    pub fn length(field: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self::new(field, ErrorKind::Length, message, input)
    }

    /// Creates a pattern error.
    pub fn pattern(field: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self::new(field, ErrorKind::Pattern, message, input)
    }

    /// Creates a custom validation error.
    pub fn custom(field: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self::new(field, ErrorKind::Custom, message, input)
    }

    /// Creates a whole-record error. Its field path is empty.
    pub fn cross_field(message: impl Into<String>, input: Value) -> Self {
        Self::new("", ErrorKind::CrossField, message, input)
    }

    /// Creates an error for an undeclared input key.
    pub fn extra(field: impl Into<String>, input: Value) -> Self {
        Self::new(field, ErrorKind::Extra, "extra inputs are not permitted", input)
    }

    /// Returns true if this error concerns the whole record rather than one field.
    pub fn is_root(&self) -> bool {
        self.field.is_empty()
    }

    /// Returns the path shown in reports.
    pub fn path(&self) -> &str {
        if self.is_root() { ROOT_PATH } else { &self.field }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.path(), self.message, self.kind)
    }
}

impl std::error::Error for ValidationError {}

/// A non-empty, ordered collection of validation errors for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Wraps a list of errors. Returns `None` when the list is empty.
    pub fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// Returns the errors recorded against one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    /// Renders one line per error: field path, message and kind code.
    pub fn report(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "error" } else { "errors" };
        writeln!(f, "{} validation {}", self.0.len(), noun)?;
        write!(f, "{}", self.report())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_errors_rejected() {
        assert!(ValidationErrors::new(Vec::new()).is_none());
    }

    #[test]
    fn test_report_lines() {
        let errors = ValidationErrors::new(vec![
            ValidationError::range("age", "value should be >= 18", Value::Int(12)),
            ValidationError::cross_field("end_date precedes start_date", Value::Null),
        ])
        .unwrap();

        assert_eq!(
            errors.report(),
            "age: value should be >= 18 [range_error]\n\
             __root__: end_date precedes start_date [cross_field_error]"
        );
        assert!(errors.to_string().starts_with("2 validation errors\n"));
    }

    #[test]
    fn test_for_field() {
        let errors = ValidationErrors::new(vec![
            ValidationError::missing("a"),
            ValidationError::missing("b"),
            ValidationError::pattern("a", "no match", Value::from("x")),
        ])
        .unwrap();

        assert_eq!(errors.for_field("a").count(), 2);
        assert_eq!(errors.for_field("c").count(), 0);
    }

    #[test]
    fn test_serialize() {
        let error = ValidationError::coercion("price", "expected float, got bool", Value::Bool(true));
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "field": "price",
                "kind": "coercion_error",
                "message": "expected float, got bool",
                "input": true
            })
        );
    }

    #[test]
    fn test_definition_error_messages() {
        let err = SchemaDefinitionError::IncompatibleConstraint {
            field: "name".to_string(),
            constraint: "gt".to_string(),
            field_type: "string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Constraint 'gt' is not applicable to field 'name' of type string"
        );
    }
}
