//! Constraint validation logic.
//!
//! This module compiles and evaluates field constraints:
//! - `gt`, `ge`, `lt`, `le`: ordering bounds on numeric and temporal fields
//! - `min_length`, `max_length`: code-point length bounds on strings
//! - `pattern`: regular expression on strings, full match unless partial
//!
//! Compatibility between a constraint and its field's type is checked once, at
//! compile time. Evaluation reports every violated constraint, in declared
//! order, never only the first.

use crate::coercion::coerce;
use records_core::{
    Constraints, FieldType, MatchMode, Result, SchemaDefinitionError, ValidationError, Value,
};
use regex::Regex;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
enum BoundKind {
    Gt,
    Ge,
    Lt,
    Le,
}

impl BoundKind {
    fn name(self) -> &'static str {
        match self {
            BoundKind::Gt => "gt",
            BoundKind::Ge => "ge",
            BoundKind::Lt => "lt",
            BoundKind::Le => "le",
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            BoundKind::Gt => "greater than",
            BoundKind::Ge => "greater than or equal to",
            BoundKind::Lt => "less than",
            BoundKind::Le => "less than or equal to",
        }
    }

    fn is_satisfied(self, ordering: Ordering) -> bool {
        match self {
            BoundKind::Gt => ordering == Ordering::Greater,
            BoundKind::Ge => ordering != Ordering::Less,
            BoundKind::Lt => ordering == Ordering::Less,
            BoundKind::Le => ordering != Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

/// Constraints of one field, checked for compatibility and ready to evaluate.
#[derive(Debug, Clone, Default)]
pub struct ConstraintValidator {
    bounds: Vec<(BoundKind, Value)>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<CompiledPattern>,
}

impl ConstraintValidator {
    /// Compiles the constraints declared on `field`.
    ///
    /// Fails if a constraint does not apply to the field's type, a pattern does
    /// not compile, or the bounds admit no value.
    pub fn compile(field: &str, field_type: &FieldType, constraints: &Constraints) -> Result<Self> {
        let incompatible = |constraint: &str| SchemaDefinitionError::IncompatibleConstraint {
            field: field.to_string(),
            constraint: constraint.to_string(),
            field_type: field_type.to_string(),
        };

        let declared = [
            (BoundKind::Gt, &constraints.gt),
            (BoundKind::Ge, &constraints.ge),
            (BoundKind::Lt, &constraints.lt),
            (BoundKind::Le, &constraints.le),
        ];

        let mut bounds = Vec::new();
        for (kind, bound) in declared {
            if let Some(bound) = bound {
                let bound = normalize_bound(field_type, bound).ok_or_else(|| incompatible(kind.name()))?;
                bounds.push((kind, bound));
            }
        }
        check_interval(field, &bounds)?;

        let is_string = matches!(field_type.base(), FieldType::String);
        if let Some(name) = constraints.string_constraint_names().first() {
            if !is_string {
                return Err(incompatible(name));
            }
        }

        if let (Some(min), Some(max)) = (constraints.min_length, constraints.max_length) {
            if min > max {
                return Err(SchemaDefinitionError::InvalidBounds {
                    field: field.to_string(),
                    message: format!("min_length {} exceeds max_length {}", min, max),
                });
            }
        }

        let pattern = match &constraints.pattern {
            Some(pattern) => {
                let anchored = match pattern.mode {
                    MatchMode::Full => format!(r"\A(?:{})\z", pattern.regex),
                    MatchMode::Search => pattern.regex.clone(),
                };
                let regex =
                    Regex::new(&anchored).map_err(|e| SchemaDefinitionError::InvalidPattern {
                        field: field.to_string(),
                        error: e.to_string(),
                    })?;
                Some(CompiledPattern {
                    source: pattern.regex.clone(),
                    regex,
                })
            }
            None => None,
        };

        Ok(Self {
            bounds,
            min_length: constraints.min_length,
            max_length: constraints.max_length,
            pattern,
        })
    }

    /// Evaluates all constraints against a coerced value.
    ///
    /// Null values (from optional fields) satisfy every constraint.
    pub fn validate(&self, field: &str, value: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if value.is_null() {
            return errors;
        }

        for (kind, bound) in &self.bounds {
            let satisfied = value
                .compare(bound)
                .map(|ordering| kind.is_satisfied(ordering))
                .unwrap_or(false);
            if !satisfied {
                errors.push(ValidationError::range(
                    field,
                    format!("value should be {} {}, got {}", kind.phrase(), bound, value),
                    value.clone(),
                ));
            }
        }

        if let Some(s) = value.as_str() {
            errors.extend(self.validate_string(field, s, value));
        }

        errors
    }

    fn validate_string(&self, field: &str, s: &str, value: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let length = s.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                errors.push(ValidationError::length(
                    field,
                    format!("value should have at least {} characters, got {}", min, length),
                    value.clone(),
                ));
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                errors.push(ValidationError::length(
                    field,
                    format!("value should have at most {} characters, got {}", max, length),
                    value.clone(),
                ));
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.regex.is_match(s) {
                errors.push(ValidationError::pattern(
                    field,
                    format!("value {} does not match pattern '{}'", value, pattern.source),
                    value.clone(),
                ));
            }
        }

        errors
    }
}

/// Brings a bound into the field's comparison domain.
///
/// Numeric fields take int or float bounds as-is. Temporal fields take bounds
/// of their own kind, or ISO strings coerced to it. Returns `None` when the
/// bound cannot apply.
fn normalize_bound(field_type: &FieldType, bound: &Value) -> Option<Value> {
    let base = field_type.base();
    match base {
        FieldType::Int | FieldType::Float => match bound {
            Value::Int(_) => Some(bound.clone()),
            Value::Float(f) if !f.is_nan() => Some(bound.clone()),
            _ => None,
        },
        FieldType::Date | FieldType::Time | FieldType::DateTime => coerce(bound, base).ok(),
        FieldType::Bool | FieldType::String | FieldType::Optional(_) => None,
    }
}

/// Rejects lower/upper bound pairs that no value satisfies.
fn check_interval(field: &str, bounds: &[(BoundKind, Value)]) -> Result<()> {
    let lowers = bounds
        .iter()
        .filter(|(kind, _)| matches!(kind, BoundKind::Gt | BoundKind::Ge));
    for (low_kind, low) in lowers {
        let uppers = bounds
            .iter()
            .filter(|(kind, _)| matches!(kind, BoundKind::Lt | BoundKind::Le));
        for (high_kind, high) in uppers {
            let empty = match low.compare(high) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => {
                    matches!(low_kind, BoundKind::Gt) || matches!(high_kind, BoundKind::Lt)
                }
                _ => false,
            };
            if empty {
                return Err(SchemaDefinitionError::InvalidBounds {
                    field: field.to_string(),
                    message: format!(
                        "{} {} and {} {} admit no value",
                        low_kind.name(),
                        low,
                        high_kind.name(),
                        high
                    ),
                });
            }
        }
    }
    Ok(())
}
