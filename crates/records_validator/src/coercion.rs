//! Type coercion.
//!
//! Converts raw values into a field's declared type under a fixed set of rules:
//!
//! - `int`: integers, or strings that parse as `i64` after trimming
//! - `float`: finite floats, integers (widened), or strings that parse as a finite `f64`
//! - `bool`: booleans, or `true/false/1/0/yes/no` in any case
//! - `string`: strings only, nothing is stringified
//! - `date`, `time`, `datetime`: the matching typed value or a zero-padded ISO-8601
//!   string (`YYYY-MM-DD`, `HH:MM[:SS[.fff]]`, `YYYY-MM-DDTHH:MM:SS[.fff]`),
//!   surrounding whitespace trimmed
//! - `optional<T>`: null stays null, anything else follows `T`
//!
//! Coercing a value that already has the declared type returns it unchanged.

use crate::CoercionError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use records_core::{FieldType, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const DATE_SHAPE: &str = "9999-99-99";
const TIME_SHAPE: &str = "99:99:99";
const SHORT_TIME_SHAPE: &str = "99:99";
const DATETIME_SHAPE: &str = "9999-99-99T99:99:99";

/// Coerces `value` to `field_type`.
pub fn coerce(value: &Value, field_type: &FieldType) -> Result<Value, CoercionError> {
    match field_type {
        FieldType::Optional(_) if value.is_null() => Ok(Value::Null),
        FieldType::Optional(inner) => coerce(value, inner),
        FieldType::Int => coerce_int(value),
        FieldType::Float => coerce_float(value),
        FieldType::Bool => coerce_bool(value),
        FieldType::String => coerce_string(value),
        FieldType::Date => coerce_date(value),
        FieldType::Time => coerce_time(value),
        FieldType::DateTime => coerce_datetime(value),
    }
}

fn coerce_int(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| CoercionError::unparsable("int", e.to_string())),
        other => Err(CoercionError::type_mismatch("int", other.type_name())),
    }
}

fn coerce_float(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Float(f) if f.is_finite() => Ok(Value::Float(*f)),
        Value::Float(f) => Err(CoercionError::non_finite(*f)),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::String(s) => {
            let parsed = s
                .trim()
                .parse::<f64>()
                .map_err(|e| CoercionError::unparsable("float", e.to_string()))?;
            if parsed.is_finite() {
                Ok(Value::Float(parsed))
            } else {
                Err(CoercionError::unparsable("float", "value is not a finite number"))
            }
        }
        other => Err(CoercionError::type_mismatch("float", other.type_name())),
    }
}

fn coerce_bool(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(CoercionError::unparsable(
                "bool",
                "expected one of true, false, 1, 0, yes, no",
            )),
        },
        other => Err(CoercionError::type_mismatch("bool", other.type_name())),
    }
}

fn coerce_string(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::String(s) => Ok(Value::String(s.clone())),
        other => Err(CoercionError::type_mismatch("string", other.type_name())),
    }
}

fn coerce_date(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Date(d) => Ok(Value::Date(*d)),
        Value::String(s) => {
            let s = s.trim();
            if !matches_shape(s, DATE_SHAPE) {
                return Err(CoercionError::unparsable("date", "expected YYYY-MM-DD"));
            }
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|e| CoercionError::unparsable("date", e.to_string()))
        }
        other => Err(CoercionError::type_mismatch("date", other.type_name())),
    }
}

fn coerce_time(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Time(t) => Ok(Value::Time(*t)),
        Value::String(s) => {
            let s = s.trim();
            let well_formed = match strip_fraction(s) {
                Some(main) if main.len() < s.len() => matches_shape(main, TIME_SHAPE),
                Some(main) => matches_shape(main, TIME_SHAPE) || matches_shape(main, SHORT_TIME_SHAPE),
                None => false,
            };
            if !well_formed {
                return Err(CoercionError::unparsable("time", "expected HH:MM[:SS[.fff]]"));
            }

            let mut first_error = None;
            for format in TIME_FORMATS {
                match NaiveTime::parse_from_str(s, format) {
                    Ok(t) => return Ok(Value::Time(t)),
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
            let reason = first_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unrecognized time".to_string());
            Err(CoercionError::unparsable("time", reason))
        }
        other => Err(CoercionError::type_mismatch("time", other.type_name())),
    }
}

fn coerce_datetime(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
        Value::String(s) => {
            let s = s.trim();
            if !strip_fraction(s).is_some_and(|main| matches_shape(main, DATETIME_SHAPE)) {
                return Err(CoercionError::unparsable(
                    "datetime",
                    "expected YYYY-MM-DDTHH:MM:SS[.fff]",
                ));
            }
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map(Value::DateTime)
                .map_err(|e| CoercionError::unparsable("datetime", e.to_string()))
        }
        other => Err(CoercionError::type_mismatch("datetime", other.type_name())),
    }
}

/// True if `s` has the exact layout of `shape`, where `9` stands for any ASCII digit.
///
/// chrono alone accepts unpadded and signed fields, so the layout is checked first.
fn matches_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'9' => c.is_ascii_digit(),
            _ => c == p,
        })
}

/// Returns `s` without a trailing `.fff` fraction, or `None` if the fraction is malformed.
fn strip_fraction(s: &str) -> Option<&str> {
    match s.split_once('.') {
        None => Some(s),
        Some((main, fraction))
            if !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()) =>
        {
            Some(main)
        }
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(coerce(&Value::Int(25), &FieldType::Int), Ok(Value::Int(25)));
        assert_eq!(
            coerce(&Value::from(" 42 "), &FieldType::Int),
            Ok(Value::Int(42))
        );
        assert!(matches!(
            coerce(&Value::from("4.2"), &FieldType::Int),
            Err(CoercionError::Unparsable { .. })
        ));
        assert_eq!(
            coerce(&Value::Float(3.0), &FieldType::Int),
            Err(CoercionError::type_mismatch("int", "float"))
        );
        assert_eq!(
            coerce(&Value::Bool(true), &FieldType::Int),
            Err(CoercionError::type_mismatch("int", "bool"))
        );
    }

    #[test]
    fn test_float_coercion() {
        assert_eq!(
            coerce(&Value::from("899.99"), &FieldType::Float),
            Ok(Value::Float(899.99))
        );
        assert_eq!(coerce(&Value::Int(0), &FieldType::Float), Ok(Value::Float(0.0)));
        assert!(coerce(&Value::from("inf"), &FieldType::Float).is_err());
        assert!(coerce(&Value::from("NaN"), &FieldType::Float).is_err());
        assert!(coerce(&Value::from("12abc"), &FieldType::Float).is_err());
        assert!(coerce(&Value::List(vec![]), &FieldType::Float).is_err());
    }

    #[test]
    fn test_native_non_finite_float_rejected() {
        assert_eq!(
            coerce(&Value::Float(f64::INFINITY), &FieldType::Float),
            Err(CoercionError::non_finite(f64::INFINITY))
        );
        assert!(matches!(
            coerce(&Value::Float(f64::NAN), &FieldType::Float),
            Err(CoercionError::NonFinite { value }) if value.is_nan()
        ));
        assert!(coerce(&Value::Float(f64::NEG_INFINITY), &FieldType::Float).is_err());
        assert_eq!(
            coerce(&Value::Float(-0.5), &FieldType::Float),
            Ok(Value::Float(-0.5))
        );
    }

    #[test]
    fn test_bool_coercion() {
        for (raw, expected) in [
            ("true", true),
            ("FALSE", false),
            ("1", true),
            ("0", false),
            ("Yes", true),
            ("no", false),
        ] {
            assert_eq!(
                coerce(&Value::from(raw), &FieldType::Bool),
                Ok(Value::Bool(expected)),
                "input {raw:?}"
            );
        }
        assert!(coerce(&Value::from("maybe"), &FieldType::Bool).is_err());
        assert!(coerce(&Value::Int(1), &FieldType::Bool).is_err());
    }

    #[test]
    fn test_string_is_never_stringified() {
        assert_eq!(
            coerce(&Value::from("abc"), &FieldType::String),
            Ok(Value::from("abc"))
        );
        assert_eq!(
            coerce(&Value::Int(5), &FieldType::String),
            Err(CoercionError::type_mismatch("string", "int"))
        );
        assert!(coerce(&Value::Null, &FieldType::String).is_err());
    }

    #[test]
    fn test_date_coercion() {
        assert_eq!(
            coerce(&Value::from("2025-07-01"), &FieldType::Date),
            Ok(Value::Date(date(2025, 7, 1)))
        );
        assert_eq!(
            coerce(&Value::Date(date(2025, 7, 1)), &FieldType::Date),
            Ok(Value::Date(date(2025, 7, 1)))
        );

        let err = coerce(&Value::from("2025-13-01"), &FieldType::Date).unwrap_err();
        let CoercionError::Unparsable { expected, reason } = err else {
            panic!("expected a parse failure");
        };
        assert_eq!(expected, "date");
        assert!(!reason.is_empty());

        assert!(coerce(&Value::from("07/01/2025"), &FieldType::Date).is_err());
    }

    #[test]
    fn test_temporal_strings_must_be_zero_padded() {
        for raw in ["2025-7-1", "+2025-07-01", "2025-07-1", "20250701"] {
            assert_eq!(
                coerce(&Value::from(raw), &FieldType::Date),
                Err(CoercionError::unparsable("date", "expected YYYY-MM-DD")),
                "input {raw:?}"
            );
        }
        for raw in ["9:5", "9:30", "09:30:5", "09:30.5", "09:30:15.", "+9:30:00"] {
            assert_eq!(
                coerce(&Value::from(raw), &FieldType::Time),
                Err(CoercionError::unparsable("time", "expected HH:MM[:SS[.fff]]")),
                "input {raw:?}"
            );
        }
        for raw in ["2025-07-01T9:30:00", "2025-7-01T09:30:00", "2025-07-01 09:30:00"] {
            assert!(
                coerce(&Value::from(raw), &FieldType::DateTime).is_err(),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn test_temporal_strings_are_trimmed() {
        for raw in [" 2025-07-01", "2025-07-01 ", "\t2025-07-01\n"] {
            assert_eq!(
                coerce(&Value::from(raw), &FieldType::Date),
                Ok(Value::Date(date(2025, 7, 1))),
                "input {raw:?}"
            );
        }
        assert_eq!(
            coerce(&Value::from(" 09:30 "), &FieldType::Time),
            Ok(Value::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()))
        );
        assert_eq!(
            coerce(&Value::from("2025-07-01T12:00:00 "), &FieldType::DateTime),
            Ok(Value::DateTime(date(2025, 7, 1).and_hms_opt(12, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_time_coercion() {
        let with_seconds = NaiveTime::from_hms_opt(9, 30, 15).unwrap();
        let without_seconds = NaiveTime::from_hms_opt(9, 30, 0).unwrap();

        assert_eq!(
            coerce(&Value::from("09:30:15"), &FieldType::Time),
            Ok(Value::Time(with_seconds))
        );
        assert_eq!(
            coerce(&Value::from("09:30"), &FieldType::Time),
            Ok(Value::Time(without_seconds))
        );
        assert_eq!(
            coerce(&Value::from("09:30:15.250"), &FieldType::Time),
            Ok(Value::Time(NaiveTime::from_hms_milli_opt(9, 30, 15, 250).unwrap()))
        );
        assert!(coerce(&Value::from("25:00"), &FieldType::Time).is_err());
    }

    #[test]
    fn test_datetime_coercion() {
        let expected = date(2025, 7, 1).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            coerce(&Value::from("2025-07-01T12:00:00"), &FieldType::DateTime),
            Ok(Value::DateTime(expected))
        );
        assert_eq!(
            coerce(&Value::from("2025-07-01T12:00:00.5"), &FieldType::DateTime),
            Ok(Value::DateTime(
                date(2025, 7, 1).and_hms_milli_opt(12, 0, 0, 500).unwrap()
            ))
        );
        assert!(coerce(&Value::from("2025-07-01"), &FieldType::DateTime).is_err());
        assert!(coerce(&Value::Date(date(2025, 7, 1)), &FieldType::DateTime).is_err());
    }

    #[test]
    fn test_optional_coercion() {
        let ty = FieldType::optional(FieldType::Int);
        assert_eq!(coerce(&Value::Null, &ty), Ok(Value::Null));
        assert_eq!(coerce(&Value::from("7"), &ty), Ok(Value::Int(7)));
        assert!(coerce(&Value::from("seven"), &ty).is_err());
    }

    #[test]
    fn test_coercion_is_stable() {
        let cases = [
            (Value::from("12"), FieldType::Int),
            (Value::from("1.5"), FieldType::Float),
            (Value::from("yes"), FieldType::Bool),
            (Value::from("2025-07-10"), FieldType::Date),
            (Value::from("08:15"), FieldType::Time),
        ];
        for (raw, ty) in cases {
            let once = coerce(&raw, &ty).unwrap();
            let twice = coerce(&once, &ty).unwrap();
            assert_eq!(once, twice);
            assert!(ty.accepts(&once));
        }
    }
}
