//! Whole-record validator pipeline.
//!
//! Record validators run in declaration order over the fully coerced record.
//! Unlike field checks, they build on each other: the first failure stops the
//! pipeline and rejects the record with a single `cross_field_error`.

use crate::schema::CompiledField;
use records_core::{Record, RecordValidatorRef, ValidationError};
use tracing::trace;

/// Runs the record validators over `record`.
pub(crate) fn run_record_validators(
    validators: &[RecordValidatorRef],
    fields: &[CompiledField],
    record: Record,
) -> Result<Record, ValidationError> {
    let mut current = record;

    for (index, validator) in validators.iter().enumerate() {
        let snapshot = current.to_value();
        current = validator.validate(current).map_err(|err| {
            trace!("Record validator #{} rejected record: {}", index, err);
            ValidationError::cross_field(err.message(), snapshot)
        })?;

        if let Some(problem) = conformance_problem(fields, &current) {
            return Err(ValidationError::cross_field(
                format!("record validator #{} produced an invalid record: {}", index, problem),
                current.to_value(),
            ));
        }
    }

    Ok(current)
}

/// Describes the first way `record` departs from the schema, if any.
fn conformance_problem(fields: &[CompiledField], record: &Record) -> Option<String> {
    if record.len() != fields.len() {
        return Some(format!(
            "expected {} fields, found {}",
            fields.len(),
            record.len()
        ));
    }

    for field in fields {
        let Some(value) = record.get(&field.name) else {
            return Some(format!("field '{}' is missing", field.name));
        };
        if !field.field_type.accepts(value) {
            return Some(format!(
                "field '{}' expected {}, got {}",
                field.name,
                field.field_type,
                value.type_name()
            ));
        }
        if let Some(violation) = field.constraints.validate(&field.name, value).first() {
            return Some(format!("field '{}': {}", field.name, violation.message));
        }
    }

    None
}
