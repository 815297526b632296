//! Builder pattern for creating schema definitions.
//!
//! This module provides ergonomic builders for declaring fields and schemas
//! with a fluent API. Builders never fail; problems such as duplicate names or
//! incompatible constraints surface when the definition is compiled.

use crate::{
    Constraints, ExtraPolicy, FieldContext, FieldDefault, FieldSpec, FieldType, MatchMode,
    PatternConstraint, PhasedValidator, Phase, Record, RecordValidatorRef, SchemaDefinition,
    SchemaOptions, ValidatorError, ValidatorRegistration, Value,
};
use std::sync::Arc;

/// Builder for creating a [`FieldSpec`].
///
/// # Example
///
/// ```rust
/// use records_core::{FieldBuilder, FieldType};
///
/// let age = FieldBuilder::new("age", FieldType::Int)
///     .description("Age in years")
///     .ge(18)
///     .le(60)
///     .build();
///
/// assert_eq!(age.name, "age");
/// assert!(age.default.is_required());
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: FieldType,
    constraints: Constraints,
    default: Option<FieldDefault>,
    validators: Vec<PhasedValidator>,
    description: Option<String>,
}

impl FieldBuilder {
    /// Creates a new field builder.
    ///
    /// # Arguments
    ///
    /// * `name` - Field name
    /// * `field_type` - Declared type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            constraints: Constraints::default(),
            default: None,
            validators: Vec::new(),
            description: None,
        }
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Requires the value to be strictly greater than `bound`.
    pub fn gt(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.gt = Some(bound.into());
        self
    }

    /// Requires the value to be greater than or equal to `bound`.
    pub fn ge(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.ge = Some(bound.into());
        self
    }

    /// Requires the value to be strictly less than `bound`.
    pub fn lt(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.lt = Some(bound.into());
        self
    }

    /// Requires the value to be less than or equal to `bound`.
    pub fn le(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.le = Some(bound.into());
        self
    }

    /// Sets the minimum length in code points.
    pub fn min_length(mut self, length: usize) -> Self {
        self.constraints.min_length = Some(length);
        self
    }

    /// Sets the maximum length in code points.
    pub fn max_length(mut self, length: usize) -> Self {
        self.constraints.max_length = Some(length);
        self
    }

    /// Requires the whole string to match `regex`.
    pub fn pattern(mut self, regex: impl Into<String>) -> Self {
        self.constraints.pattern = Some(PatternConstraint {
            regex: regex.into(),
            mode: MatchMode::Full,
        });
        self
    }

    /// Requires some substring to match `regex`.
    pub fn pattern_partial(mut self, regex: impl Into<String>) -> Self {
        self.constraints.pattern = Some(PatternConstraint {
            regex: regex.into(),
            mode: MatchMode::Search,
        });
        self
    }

    /// Replaces all constraints at once.
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Makes the field required: absence from the input is an error.
    ///
    /// For `optional<T>` fields this still accepts an explicit null.
    pub fn required(mut self) -> Self {
        self.default = Some(FieldDefault::Required);
        self
    }

    /// Uses a copy of `value` when the field is absent.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    /// Calls `factory` for a fresh value each time the field is absent.
    pub fn default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(FieldDefault::Factory(Arc::new(factory)));
        self
    }

    /// Sets the absence behavior directly.
    pub fn default_behavior(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Adds a validator that runs before type coercion.
    pub fn before<F>(self, validator: F) -> Self
    where
        F: Fn(Value, &FieldContext<'_>) -> Result<Value, ValidatorError> + Send + Sync + 'static,
    {
        self.validator(Phase::Before, validator)
    }

    /// Adds a validator that runs after coercion and constraint checks.
    pub fn after<F>(self, validator: F) -> Self
    where
        F: Fn(Value, &FieldContext<'_>) -> Result<Value, ValidatorError> + Send + Sync + 'static,
    {
        self.validator(Phase::After, validator)
    }

    /// Adds a validator for the given phase.
    pub fn validator<F>(mut self, phase: Phase, validator: F) -> Self
    where
        F: Fn(Value, &FieldContext<'_>) -> Result<Value, ValidatorError> + Send + Sync + 'static,
    {
        self.validators.push(PhasedValidator {
            phase,
            validator: Arc::new(validator),
        });
        self
    }

    /// Builds the field.
    ///
    /// Without an explicit default, `optional<T>` fields default to null and
    /// every other field is required.
    pub fn build(self) -> FieldSpec {
        let default = self.default.unwrap_or_else(|| {
            if self.field_type.is_optional() {
                FieldDefault::Value(Value::Null)
            } else {
                FieldDefault::Required
            }
        });

        FieldSpec {
            name: self.name,
            field_type: self.field_type,
            constraints: self.constraints,
            default,
            validators: self.validators,
            description: self.description,
        }
    }
}

/// Builder for creating a [`SchemaDefinition`].
///
/// # Example
///
/// ```rust
/// use records_core::{FieldBuilder, FieldType, Record, SchemaBuilder, Value};
///
/// let definition = SchemaBuilder::new("booking")
///     .field(FieldBuilder::new("start_date", FieldType::Date).build())
///     .field(FieldBuilder::new("end_date", FieldType::Date).build())
///     .record_validator(|record: Record| {
///         let start = record.get("start_date").and_then(Value::as_date);
///         let end = record.get("end_date").and_then(Value::as_date);
///         if end < start {
///             return Err("end_date must not precede start_date".into());
///         }
///         Ok(record)
///     })
///     .build();
///
/// assert_eq!(definition.fields.len(), 2);
/// assert_eq!(definition.record_validators.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    definition: SchemaDefinition,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            definition: SchemaDefinition {
                options: SchemaOptions {
                    name: name.into(),
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    /// Adds a field to the schema.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.definition.fields.push(field);
        self
    }

    /// Adds multiple fields to the schema.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.definition.fields.extend(fields);
        self
    }

    /// Binds one validator to several fields.
    ///
    /// The validator runs once per named field, after any validators declared
    /// on the field itself.
    pub fn validator<F>(mut self, fields: &[&str], phase: Phase, validator: F) -> Self
    where
        F: Fn(Value, &FieldContext<'_>) -> Result<Value, ValidatorError> + Send + Sync + 'static,
    {
        self.definition.registrations.push(ValidatorRegistration {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            phase,
            validator: Arc::new(validator),
        });
        self
    }

    /// Adds a prepared registration.
    pub fn registration(mut self, registration: ValidatorRegistration) -> Self {
        self.definition.registrations.push(registration);
        self
    }

    /// Adds a whole-record validator.
    pub fn record_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(Record) -> Result<Record, ValidatorError> + Send + Sync + 'static,
    {
        self.definition.record_validators.push(Arc::new(validator));
        self
    }

    /// Adds a shared whole-record validator.
    pub fn record_validator_ref(mut self, validator: RecordValidatorRef) -> Self {
        self.definition.record_validators.push(validator);
        self
    }

    /// Sets the extra-key policy.
    pub fn extra(mut self, policy: ExtraPolicy) -> Self {
        self.definition.options.extra = policy;
        self
    }

    /// Rejects input keys the schema does not declare.
    pub fn forbid_extra(self) -> Self {
        self.extra(ExtraPolicy::Forbid)
    }

    /// Returns the fields declared so far.
    pub fn declared_fields(&self) -> &[FieldSpec] {
        &self.definition.fields
    }

    /// Builds the definition.
    pub fn build(self) -> SchemaDefinition {
        self.definition
    }
}
