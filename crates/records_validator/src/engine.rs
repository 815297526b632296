//! Main validation engine.
//!
//! Orchestrates one validation call:
//!
//! 1. per field, in declared order: resolve presence or default, run
//!    pre-coercion validators, coerce, evaluate constraints, run post-coercion
//!    validators; failures are collected and the next field is processed
//! 2. under [`ExtraPolicy::Forbid`], each undeclared input key is an error
//! 3. any error so far rejects the record; record validators never run
//! 4. otherwise record validators run in order; the first failure rejects
//! 5. the finished record is accepted

use crate::coercion::coerce;
use crate::cross_field::run_record_validators;
use crate::custom::run_chain;
use crate::schema::{CompiledField, Schema};
use records_core::{
    ExtraPolicy, FieldContext, FieldDefault, Phase, Record, ValidationError, ValidationErrors,
    ValidationResult, Value,
};
use std::collections::HashMap;
use tracing::{debug, trace};

impl Schema {
    /// Validates one raw input mapping.
    ///
    /// # Example
    ///
    /// ```rust
    /// use records_core::{FieldBuilder, FieldType, Value};
    /// use records_validator::define_schema;
    /// use std::collections::HashMap;
    ///
    /// let schema = define_schema(
    ///     vec![FieldBuilder::new("age", FieldType::Int).ge(18).le(60).build()],
    ///     Vec::new(),
    /// )
    /// .unwrap();
    ///
    /// let input = HashMap::from([("age".to_string(), Value::Int(25))]);
    /// let result = schema.validate(&input);
    /// assert!(result.is_success());
    ///
    /// let input = HashMap::from([("age".to_string(), Value::Int(12))]);
    /// let result = schema.validate(&input);
    /// assert!(!result.is_success());
    /// println!("{}", result.report());
    /// ```
    pub fn validate(&self, input: &HashMap<String, Value>) -> ValidationResult {
        let mut errors = Vec::new();
        let mut values = Vec::with_capacity(self.fields.len());

        for field in &self.fields {
            match validate_field(field, input.get(&field.name)) {
                Ok(value) => values.push((field.name.clone(), value)),
                Err(field_errors) => errors.extend(field_errors),
            }
        }

        if self.extra == ExtraPolicy::Forbid {
            errors.extend(self.extra_key_errors(input));
        }

        if let Some(errors) = ValidationErrors::new(errors) {
            debug!(
                "Schema '{}' rejected record with {} field errors",
                self.name,
                errors.len()
            );
            return ValidationResult::Rejected(errors);
        }

        let record: Record = values.into_iter().collect();
        match run_record_validators(&self.record_validators, &self.fields, record) {
            Ok(record) => {
                debug!("Schema '{}' accepted record", self.name);
                ValidationResult::Accepted(record)
            }
            Err(error) => {
                debug!(
                    "Schema '{}' rejected record in record validators: {}",
                    self.name, error.message
                );
                ValidationResult::Rejected(single(error))
            }
        }
    }

    /// Validates a JSON document.
    ///
    /// The document must be an object; anything else is rejected with one
    /// root-level `coercion_error`.
    pub fn validate_json(&self, input: &serde_json::Value) -> ValidationResult {
        match input {
            serde_json::Value::Object(map) => {
                let input: HashMap<String, Value> = map
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect();
                self.validate(&input)
            }
            other => {
                let raw = Value::from(other);
                let error = ValidationError::coercion(
                    "",
                    format!("expected an object, got {}", raw.type_name()),
                    raw,
                );
                ValidationResult::Rejected(single(error))
            }
        }
    }

    fn extra_key_errors(&self, input: &HashMap<String, Value>) -> Vec<ValidationError> {
        let mut extra: Vec<(&String, &Value)> = input
            .iter()
            .filter(|(key, _)| self.field(key).is_none())
            .collect();
        extra.sort_by(|a, b| a.0.cmp(b.0));
        extra
            .into_iter()
            .map(|(key, value)| ValidationError::extra(key.as_str(), value.clone()))
            .collect()
    }
}

/// Validates `input` against `schema`.
pub fn validate(schema: &Schema, input: &HashMap<String, Value>) -> ValidationResult {
    schema.validate(input)
}

fn single(error: ValidationError) -> ValidationErrors {
    ValidationErrors::new(vec![error])
        .unwrap_or_else(|| unreachable!("a one-element list is never empty"))
}

/// Runs the per-field stages for one field.
fn validate_field(
    field: &CompiledField,
    raw: Option<&Value>,
) -> Result<Value, Vec<ValidationError>> {
    let value = match (raw, &field.default) {
        (Some(value), _) => value.clone(),
        (None, FieldDefault::Required) => {
            trace!("Field '{}' missing", field.name);
            return Err(vec![ValidationError::missing(&field.name)]);
        }
        (None, FieldDefault::Value(default)) => default.clone(),
        (None, FieldDefault::Factory(factory)) => factory(),
    };

    let before = FieldContext {
        field: &field.name,
        field_type: &field.field_type,
        phase: Phase::Before,
    };
    let staged = run_chain(&field.before, value, &before).map_err(|e| vec![e])?;

    let coerced = coerce(&staged, &field.field_type).map_err(|e| {
        trace!("Field '{}' failed coercion: {}", field.name, e);
        vec![ValidationError::coercion(&field.name, e.to_string(), staged.clone())]
    })?;

    let violations = field.constraints.validate(&field.name, &coerced);
    if !violations.is_empty() {
        return Err(violations);
    }

    let after = FieldContext {
        phase: Phase::After,
        ..before
    };
    let value = run_chain(&field.after, coerced, &after).map_err(|e| vec![e])?;

    // Post validators may transform the value; it must still fit the field.
    if !field.field_type.accepts(&value) {
        trace!("Field '{}' post validator broke its type", field.name);
        return Err(vec![ValidationError::custom(
            &field.name,
            format!(
                "validator returned {}, expected {}",
                value.type_name(),
                field.field_type
            ),
            value,
        )]);
    }
    let violations = field.constraints.validate(&field.name, &value);
    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(value)
}
