//! Schema compilation.
//!
//! Turns a declarative [`SchemaDefinition`] into an immutable [`Schema`]. All
//! definition problems are detected here: duplicate names, nested optionals,
//! incompatible constraints, invalid patterns, validators bound to unknown
//! fields, and literal defaults rejected by their own field.

use crate::ConstraintValidator;
use crate::coercion::coerce;
use records_core::{
    ExtraPolicy, FieldDefault, FieldSpec, FieldType, FieldValidatorRef, Phase,
    RecordValidatorRef, Result, SchemaDefinition, SchemaDefinitionError, Value,
};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// A field ready for validation.
#[derive(Clone)]
pub(crate) struct CompiledField {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) constraints: ConstraintValidator,
    pub(crate) default: FieldDefault,
    pub(crate) before: Vec<FieldValidatorRef>,
    pub(crate) after: Vec<FieldValidatorRef>,
    pub(crate) description: Option<String>,
}

/// An immutable, compiled schema.
///
/// A `Schema` is `Send + Sync` and can be shared across threads to validate
/// records concurrently without locking.
///
/// # Example
///
/// ```rust
/// use records_core::{FieldBuilder, FieldType, SchemaBuilder};
/// use records_validator::Schema;
///
/// let schema = Schema::compile(
///     SchemaBuilder::new("signup")
///         .field(FieldBuilder::new("age", FieldType::Int).ge(18).le(60).build())
///         .build(),
/// )
/// .expect("valid schema");
///
/// assert_eq!(schema.name(), "signup");
/// assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["age"]);
/// ```
#[derive(Clone)]
pub struct Schema {
    pub(crate) name: String,
    pub(crate) fields: Vec<CompiledField>,
    pub(crate) record_validators: Vec<RecordValidatorRef>,
    pub(crate) extra: ExtraPolicy,
}

impl Schema {
    /// Compiles a schema definition.
    pub fn compile(definition: SchemaDefinition) -> Result<Self> {
        let SchemaDefinition {
            fields,
            registrations,
            record_validators,
            options,
        } = definition;

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaDefinitionError::DuplicateField(field.name.clone()));
            }
        }

        let mut compiled = fields
            .into_iter()
            .map(compile_field)
            .collect::<Result<Vec<_>>>()?;

        for registration in registrations {
            for name in &registration.fields {
                let field = compiled
                    .iter_mut()
                    .find(|f| &f.name == name)
                    .ok_or_else(|| SchemaDefinitionError::UnknownField(name.clone()))?;
                let validator = registration.validator.clone();
                match registration.phase {
                    Phase::Before => field.before.push(validator),
                    Phase::After => field.after.push(validator),
                }
            }
        }

        debug!(
            "Compiled schema '{}' with {} fields and {} record validators",
            options.name,
            compiled.len(),
            record_validators.len()
        );

        Ok(Self {
            name: options.name,
            fields: compiled,
            record_validators,
            extra: options.extra,
        })
    }

    /// Returns the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the declared type of a field.
    pub fn field_type(&self, field: &str) -> Option<&FieldType> {
        self.field(field).map(|f| &f.field_type)
    }

    /// Returns the description of a field, if one was declared.
    pub fn field_description(&self, field: &str) -> Option<&str> {
        self.field(field).and_then(|f| f.description.as_deref())
    }

    /// Returns true if absence of the field is an error.
    pub fn is_required(&self, field: &str) -> bool {
        self.field(field)
            .map(|f| f.default.is_required())
            .unwrap_or(false)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn extra_policy(&self) -> ExtraPolicy {
        self.extra
    }

    pub(crate) fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field(
                "fields",
                &self
                    .fields
                    .iter()
                    .map(|field| (field.name.as_str(), field.field_type.to_string()))
                    .collect::<Vec<_>>(),
            )
            .field("record_validators", &self.record_validators.len())
            .field("extra", &self.extra)
            .finish()
    }
}

/// Defines a schema from ordered fields and whole-record validators.
///
/// Equivalent to compiling a [`SchemaDefinition`] with default options.
pub fn define_schema(
    fields: Vec<FieldSpec>,
    record_validators: Vec<RecordValidatorRef>,
) -> Result<Schema> {
    Schema::compile(SchemaDefinition::new(fields, record_validators))
}

fn compile_field(spec: FieldSpec) -> Result<CompiledField> {
    if let FieldType::Optional(inner) = &spec.field_type {
        if inner.is_optional() {
            return Err(SchemaDefinitionError::NestedOptional(spec.name));
        }
    }

    let constraints = ConstraintValidator::compile(&spec.name, &spec.field_type, &spec.constraints)?;

    if let FieldDefault::Value(default) = &spec.default {
        check_default(&spec.name, &spec.field_type, &constraints, default)?;
    }

    let mut before = Vec::new();
    let mut after = Vec::new();
    for phased in spec.validators {
        match phased.phase {
            Phase::Before => before.push(phased.validator),
            Phase::After => after.push(phased.validator),
        }
    }

    Ok(CompiledField {
        name: spec.name,
        field_type: spec.field_type,
        constraints,
        default: spec.default,
        before,
        after,
        description: spec.description,
    })
}

/// A literal default must itself coerce to the field's type and satisfy its constraints.
fn check_default(
    field: &str,
    field_type: &FieldType,
    constraints: &ConstraintValidator,
    default: &Value,
) -> Result<()> {
    let invalid = |message: String| SchemaDefinitionError::InvalidDefault {
        field: field.to_string(),
        message,
    };

    let coerced = coerce(default, field_type).map_err(|e| invalid(e.to_string()))?;
    match constraints.validate(field, &coerced).first() {
        Some(violation) => Err(invalid(violation.message.clone())),
        None => Ok(()),
    }
}
