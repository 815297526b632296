//! Field-level custom validator pipeline.
//!
//! Validators of one phase run in registration order, each receiving the
//! previous one's output. The first failure becomes a `custom_validation_error`
//! for the field and ends the chain.

use records_core::{FieldContext, FieldValidatorRef, ValidationError, Value};
use tracing::trace;

/// Runs a chain of field validators over `value`.
pub(crate) fn run_chain(
    validators: &[FieldValidatorRef],
    value: Value,
    ctx: &FieldContext<'_>,
) -> Result<Value, ValidationError> {
    let mut current = value;

    for (index, validator) in validators.iter().enumerate() {
        let input = current.clone();
        match validator.validate(current, ctx) {
            Ok(next) => current = next,
            Err(err) => {
                trace!(
                    "Validator #{} ({:?}) rejected field '{}': {}",
                    index, ctx.phase, ctx.field, err
                );
                return Err(ValidationError::custom(ctx.field, err.message(), input));
            }
        }
    }

    Ok(current)
}
