//! Validator traits for custom field and record rules.
//!
//! Field validators transform or reject one field's value; record validators
//! see the fully coerced record. Both are plain closures in the common case,
//! thanks to blanket implementations over `Fn`.

use crate::{FieldType, Record, Value};
use std::sync::Arc;
use thiserror::Error;

/// Failure signaled by a user-supplied validator.
///
/// The message becomes the message of the resulting
/// [`ValidationError`](crate::ValidationError).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidatorError {
    message: String,
}

impl ValidatorError {
    /// Creates a new validator error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for ValidatorError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ValidatorError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// When a field validator runs relative to type coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Receives the raw input; its output is what gets coerced
    Before,
    /// Receives the coerced value, after constraint evaluation
    After,
}

/// Information handed to a field validator alongside the value.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Name of the field being validated
    pub field: &'a str,
    /// Declared type of the field
    pub field_type: &'a FieldType,
    /// Phase the validator was registered for
    pub phase: Phase,
}

/// A field-level validator.
///
/// Returning `Ok` hands the (possibly transformed) value to the next stage.
/// Implementations must be free of shared mutable state: a compiled schema
/// may run the same validator from several threads at once.
///
/// # Example
///
/// ```rust
/// use records_core::{FieldContext, FieldValidator, Value, ValidatorError};
///
/// struct Trim;
///
/// impl FieldValidator for Trim {
///     fn validate(&self, value: Value, _ctx: &FieldContext<'_>) -> Result<Value, ValidatorError> {
///         match value {
///             Value::String(s) => Ok(Value::String(s.trim().to_string())),
///             other => Ok(other),
///         }
///     }
/// }
/// ```
pub trait FieldValidator: Send + Sync {
    /// Validates or transforms one field value.
    fn validate(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value, ValidatorError>;
}

impl<F> FieldValidator for F
where
    F: Fn(Value, &FieldContext<'_>) -> Result<Value, ValidatorError> + Send + Sync,
{
    fn validate(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value, ValidatorError> {
        self(value, ctx)
    }
}

/// A whole-record validator expressing invariants across fields.
///
/// Receives the coerced record and returns it, possibly modified. Only values
/// of declared fields may be replaced; the engine re-checks the returned record
/// against the schema.
pub trait RecordValidator: Send + Sync {
    /// Validates or transforms a complete record.
    fn validate(&self, record: Record) -> Result<Record, ValidatorError>;
}

impl<F> RecordValidator for F
where
    F: Fn(Record) -> Result<Record, ValidatorError> + Send + Sync,
{
    fn validate(&self, record: Record) -> Result<Record, ValidatorError> {
        self(record)
    }
}

/// Shared handle to a field validator.
pub type FieldValidatorRef = Arc<dyn FieldValidator>;

/// Shared handle to a record validator.
pub type RecordValidatorRef = Arc<dyn RecordValidator>;

/// Zero-argument producer of a default value, invoked once per validation.
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_as_field_validator() {
        let upper = |value: Value, _ctx: &FieldContext<'_>| -> Result<Value, ValidatorError> {
            match value {
                Value::String(s) => Ok(Value::String(s.to_uppercase())),
                _ => Err("expected a string".into()),
            }
        };
        let validator: FieldValidatorRef = Arc::new(upper);

        let ctx = FieldContext {
            field: "code",
            field_type: &FieldType::String,
            phase: Phase::After,
        };
        assert_eq!(
            validator.validate(Value::from("ab"), &ctx),
            Ok(Value::from("AB"))
        );
        assert_eq!(
            validator.validate(Value::Int(1), &ctx).unwrap_err().message(),
            "expected a string"
        );
    }

    #[test]
    fn test_closure_as_record_validator() {
        let validator: RecordValidatorRef = Arc::new(|record: Record| {
            if record.get("a").is_some() {
                Ok(record)
            } else {
                Err(ValidatorError::new("a is required"))
            }
        });

        let record: Record = vec![("a".to_string(), Value::Int(1))].into_iter().collect();
        assert!(validator.validate(record).is_ok());
        assert!(validator.validate(Record::new()).is_err());
    }
}
