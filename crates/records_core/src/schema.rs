//! Declarative schema definitions.
//!
//! A [`SchemaDefinition`] is the uncompiled description of a schema: fields,
//! broadcast validator registrations, record validators and options. The
//! validation engine compiles it into an immutable schema, which is where
//! definition errors are reported.

use crate::{FieldSpec, FieldValidatorRef, Phase, RecordValidatorRef};
use std::fmt;

/// How input keys that the schema does not declare are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraPolicy {
    /// Undeclared keys are dropped silently
    #[default]
    Ignore,
    /// Each undeclared key is an `extra_forbidden` error
    Forbid,
}

/// Schema-wide options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Schema name used in logs
    pub name: String,
    /// Treatment of undeclared input keys
    pub extra: ExtraPolicy,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            name: "schema".to_string(),
            extra: ExtraPolicy::default(),
        }
    }
}

/// One validator bound to a set of field names.
///
/// The validator runs once per named field, with that field's own value.
#[derive(Clone)]
pub struct ValidatorRegistration {
    /// Fields the validator is bound to
    pub fields: Vec<String>,
    /// Phase relative to coercion
    pub phase: Phase,
    /// The validator itself
    pub validator: FieldValidatorRef,
}

impl fmt::Debug for ValidatorRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistration")
            .field("fields", &self.fields)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Uncompiled description of a schema.
#[derive(Clone, Default)]
pub struct SchemaDefinition {
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,

    /// Broadcast validator registrations in registration order
    pub registrations: Vec<ValidatorRegistration>,

    /// Whole-record validators in declaration order
    pub record_validators: Vec<RecordValidatorRef>,

    /// Schema-wide options
    pub options: SchemaOptions,
}

impl SchemaDefinition {
    /// Creates a definition from fields and record validators with default options.
    pub fn new(fields: Vec<FieldSpec>, record_validators: Vec<RecordValidatorRef>) -> Self {
        Self {
            fields,
            record_validators,
            ..Default::default()
        }
    }
}

impl fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("fields", &self.fields)
            .field("registrations", &self.registrations)
            .field("record_validators", &self.record_validators.len())
            .field("options", &self.options)
            .finish()
    }
}
