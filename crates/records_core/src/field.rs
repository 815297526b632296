//! Field declarations: types, constraints, defaults.

use crate::{DefaultFactory, FieldValidatorRef, Phase, SchemaDefinitionError, Value};
use std::fmt;
use std::str::FromStr;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// Date and time (`YYYY-MM-DDTHH:MM:SS`)
    DateTime,
    /// Wall-clock time (`HH:MM[:SS]`)
    Time,
    /// Nullable wrapper around another type
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Wraps a type as `optional<T>`.
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// Returns the type with any `optional` wrapper removed.
    pub fn base(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.base(), FieldType::Int | FieldType::Float)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self.base(),
            FieldType::Date | FieldType::DateTime | FieldType::Time
        )
    }

    /// Returns true if the value already has this type, with no coercion needed.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Optional(_), Value::Null) => true,
            (FieldType::Optional(inner), other) => inner.accepts(other),
            (FieldType::Int, Value::Int(_)) => true,
            (FieldType::Float, Value::Float(_)) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Date, Value::Date(_)) => true,
            (FieldType::DateTime, Value::DateTime(_)) => true,
            (FieldType::Time, Value::Time(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::String => f.write_str("string"),
            FieldType::Date => f.write_str("date"),
            FieldType::DateTime => f.write_str("datetime"),
            FieldType::Time => f.write_str("time"),
            FieldType::Optional(inner) => write!(f, "optional<{}>", inner),
        }
    }
}

impl FromStr for FieldType {
    type Err = SchemaDefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        if let Some(inner) = normalized
            .strip_prefix("optional<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return Ok(FieldType::optional(inner.parse()?));
        }

        match normalized.as_str() {
            "int" | "integer" => Ok(FieldType::Int),
            "float" => Ok(FieldType::Float),
            "bool" | "boolean" => Ok(FieldType::Bool),
            "string" | "str" => Ok(FieldType::String),
            "date" => Ok(FieldType::Date),
            "datetime" => Ok(FieldType::DateTime),
            "time" => Ok(FieldType::Time),
            _ => Err(SchemaDefinitionError::UnknownType(s.to_string())),
        }
    }
}

/// How a pattern is matched against a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The whole string must match
    #[default]
    Full,
    /// Any substring may match
    Search,
}

/// Regular expression constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternConstraint {
    /// Regular expression source
    pub regex: String,
    /// Full or partial matching
    pub mode: MatchMode,
}

/// Declarative constraints on a field.
///
/// Each kind appears at most once. They are evaluated in field order:
/// `gt`, `ge`, `lt`, `le`, `min_length`, `max_length`, `pattern`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Exclusive lower bound
    pub gt: Option<Value>,
    /// Inclusive lower bound
    pub ge: Option<Value>,
    /// Exclusive upper bound
    pub lt: Option<Value>,
    /// Inclusive upper bound
    pub le: Option<Value>,
    /// Minimum length in code points
    pub min_length: Option<usize>,
    /// Maximum length in code points
    pub max_length: Option<usize>,
    /// Regular expression the string must match
    pub pattern: Option<PatternConstraint>,
}

impl Constraints {
    /// Returns true if no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self == &Constraints::default()
    }

    /// Names of the declared string constraints, in evaluation order.
    pub fn string_constraint_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.min_length.is_some() {
            names.push("min_length");
        }
        if self.max_length.is_some() {
            names.push("max_length");
        }
        if self.pattern.is_some() {
            names.push("pattern");
        }
        names
    }
}

/// What happens when a field is absent from the input.
#[derive(Clone)]
pub enum FieldDefault {
    /// Absence is a `missing` error
    Required,
    /// Absence resolves to a copy of this value
    Value(Value),
    /// Absence resolves to a freshly produced value
    Factory(DefaultFactory),
}

impl FieldDefault {
    pub fn is_required(&self) -> bool {
        matches!(self, FieldDefault::Required)
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Required => f.write_str("Required"),
            FieldDefault::Value(v) => f.debug_tuple("Value").field(v).finish(),
            FieldDefault::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// A field validator together with the phase it runs in.
#[derive(Clone)]
pub struct PhasedValidator {
    pub phase: Phase,
    pub validator: FieldValidatorRef,
}

impl fmt::Debug for PhasedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhasedValidator")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// A single field declaration in a schema.
///
/// Usually created through [`FieldBuilder`](crate::FieldBuilder).
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name, unique within the schema
    pub name: String,

    /// Declared type
    pub field_type: FieldType,

    /// Declared constraints
    pub constraints: Constraints,

    /// Behavior when the field is absent
    pub default: FieldDefault,

    /// Validators in registration order
    pub validators: Vec<PhasedValidator>,

    /// Optional human-readable description
    pub description: Option<String>,
}
