//! End-to-end validation scenarios.
//!
//! Covers the behaviors a caller relies on when validating records:
//! - accepted records hold the coerced values in declared order
//! - every failing field is reported, never just the first
//! - accepted records validate again to the same record

use pretty_assertions::assert_eq;
use records_core::{
    ErrorKind, FieldBuilder, FieldType, Record, SchemaBuilder, ValidatorError, Value,
};
use records_validator::{Schema, define_schema};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn input(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn kinds(errors: &[records_core::ValidationError]) -> Vec<(&str, ErrorKind)> {
    errors.iter().map(|e| (e.path(), e.kind)).collect()
}

#[test]
fn test_age_range() {
    init_tracing();
    let schema = define_schema(
        vec![FieldBuilder::new("age", FieldType::Int).ge(18).le(60).build()],
        Vec::new(),
    )
    .unwrap();

    let accepted = schema.validate(&input(&[("age", Value::Int(25))]));
    assert_eq!(
        accepted.into_record().unwrap().into_map(),
        input(&[("age", Value::Int(25))])
    );

    let rejected = schema.validate(&input(&[("age", Value::Int(12))]));
    assert_eq!(kinds(rejected.errors()), vec![("age", ErrorKind::Range)]);
    assert_eq!(
        rejected.report(),
        "age: value should be greater than or equal to 18, got 12 [range_error]"
    );
}

#[test]
fn test_date_ordering_rule() {
    init_tracing();
    let schema = Schema::compile(
        SchemaBuilder::new("booking")
            .field(FieldBuilder::new("start_date", FieldType::Date).build())
            .field(FieldBuilder::new("end_date", FieldType::Date).build())
            .record_validator(|record| {
                let start = record.get("start_date").and_then(Value::as_date);
                let end = record.get("end_date").and_then(Value::as_date);
                if end >= start {
                    Ok(record)
                } else {
                    Err(ValidatorError::new("end_date must not precede start_date"))
                }
            })
            .build(),
    )
    .unwrap();

    let accepted = schema.validate(&input(&[
        ("start_date", Value::from("2025-07-01")),
        ("end_date", Value::from("2025-07-10")),
    ]));
    let record = accepted.into_record().unwrap();
    assert_eq!(
        record.get("start_date"),
        Some(&Value::Date(
            chrono::NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        ))
    );

    let rejected = schema.validate(&input(&[
        ("start_date", Value::from("2025-08-01")),
        ("end_date", Value::from("2025-07-10")),
    ]));
    assert_eq!(
        kinds(rejected.errors()),
        vec![("__root__", ErrorKind::CrossField)]
    );
    assert_eq!(
        rejected.errors()[0].message,
        "end_date must not precede start_date"
    );
}

#[test]
fn test_positive_price() {
    let schema = define_schema(
        vec![FieldBuilder::new("price", FieldType::Float).gt(0).build()],
        Vec::new(),
    )
    .unwrap();

    let rejected = schema.validate(&input(&[("price", Value::Int(0))]));
    assert_eq!(kinds(rejected.errors()), vec![("price", ErrorKind::Range)]);

    let accepted = schema.validate(&input(&[("price", Value::from("899.99"))]));
    assert_eq!(
        accepted.record().and_then(|r| r.get("price")),
        Some(&Value::Float(899.99))
    );
}

#[test]
fn test_email_pattern() {
    let schema = define_schema(
        vec![FieldBuilder::new("email", FieldType::String)
            .pattern(r"^\S+@\S+\.\S+$")
            .build()],
        Vec::new(),
    )
    .unwrap();

    let rejected = schema.validate(&input(&[("email", Value::from("not-an-email"))]));
    assert_eq!(kinds(rejected.errors()), vec![("email", ErrorKind::Pattern)]);
    assert_eq!(rejected.errors()[0].input, Value::from("not-an-email"));

    assert!(
        schema
            .validate(&input(&[("email", Value::from("ada@example.com"))]))
            .is_success()
    );
}

#[test]
fn test_all_missing_fields_reported_in_order() {
    let schema = define_schema(
        vec![
            FieldBuilder::new("c", FieldType::String).build(),
            FieldBuilder::new("a", FieldType::Int).build(),
            FieldBuilder::new("b", FieldType::optional(FieldType::Int)).build(),
            FieldBuilder::new("d", FieldType::Bool).build(),
        ],
        Vec::new(),
    )
    .unwrap();

    let result = schema.validate(&HashMap::new());
    assert_eq!(
        kinds(result.errors()),
        vec![
            ("c", ErrorKind::Missing),
            ("a", ErrorKind::Missing),
            ("d", ErrorKind::Missing),
        ]
    );
    assert!(result.errors().iter().all(|e| e.message == "field required"));
}

#[test]
fn test_independent_fields_fail_independently() {
    let schema = define_schema(
        vec![
            FieldBuilder::new("age", FieldType::Int).ge(18).build(),
            FieldBuilder::new("email", FieldType::String)
                .pattern(r"\S+@\S+")
                .build(),
            FieldBuilder::new("nickname", FieldType::String)
                .min_length(2)
                .build(),
        ],
        Vec::new(),
    )
    .unwrap();

    let result = schema.validate(&input(&[
        ("age", Value::Int(3)),
        ("email", Value::from("nope")),
        ("nickname", Value::from("ok")),
    ]));

    assert_eq!(
        kinds(result.errors()),
        vec![("age", ErrorKind::Range), ("email", ErrorKind::Pattern)]
    );
}

#[test]
fn test_one_field_may_violate_several_constraints() {
    let schema = define_schema(
        vec![FieldBuilder::new("code", FieldType::String)
            .min_length(5)
            .pattern("[0-9]+")
            .build()],
        Vec::new(),
    )
    .unwrap();

    let result = schema.validate(&input(&[("code", Value::from("ab"))]));
    assert_eq!(
        kinds(result.errors()),
        vec![("code", ErrorKind::Length), ("code", ErrorKind::Pattern)]
    );
}

#[test]
fn test_accepted_record_revalidates_to_itself() {
    let schema = define_schema(
        vec![
            FieldBuilder::new("id", FieldType::Int).build(),
            FieldBuilder::new("active", FieldType::Bool).build(),
            FieldBuilder::new("joined", FieldType::DateTime).build(),
            FieldBuilder::new("score", FieldType::Float).ge(0).build(),
            FieldBuilder::new("note", FieldType::optional(FieldType::String)).build(),
        ],
        Vec::new(),
    )
    .unwrap();

    let first = schema
        .validate(&input(&[
            ("id", Value::from(" 42 ")),
            ("active", Value::from("yes")),
            ("joined", Value::from("2024-03-01T09:30:00")),
            ("score", Value::Int(7)),
        ]))
        .into_record()
        .unwrap();

    let second = schema
        .validate(&first.clone().into_map())
        .into_record()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.field_names().collect::<Vec<_>>(),
        vec!["id", "active", "joined", "score", "note"]
    );
}

#[test]
fn test_default_factory_runs_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let schema = define_schema(
        vec![FieldBuilder::new("seq", FieldType::Int)
            .default_factory(move || Value::from(counter.fetch_add(1, Ordering::SeqCst) as i64))
            .build()],
        Vec::new(),
    )
    .unwrap();

    let first = schema.validate(&HashMap::new()).into_record().unwrap();
    let second = schema.validate(&HashMap::new()).into_record().unwrap();
    let supplied = schema
        .validate(&input(&[("seq", Value::Int(99))]))
        .into_record()
        .unwrap();

    assert_eq!(first.get("seq"), Some(&Value::Int(0)));
    assert_eq!(second.get("seq"), Some(&Value::Int(1)));
    assert_eq!(supplied.get("seq"), Some(&Value::Int(99)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_defaults_pass_through_validators() {
    let schema = define_schema(
        vec![FieldBuilder::new("retries", FieldType::Int)
            .default("3")
            .le(5)
            .build()],
        Vec::new(),
    )
    .unwrap();

    let record = schema.validate(&HashMap::new()).into_record().unwrap();
    assert_eq!(record.get("retries"), Some(&Value::Int(3)));
}

#[test]
fn test_temporal_bounds() {
    let schema = define_schema(
        vec![FieldBuilder::new("opens", FieldType::Time)
            .ge("08:00")
            .lt("18:00")
            .build()],
        Vec::new(),
    )
    .unwrap();

    assert!(
        schema
            .validate(&input(&[("opens", Value::from("09:15"))]))
            .is_success()
    );
    let late = schema.validate(&input(&[("opens", Value::from("18:00:00"))]));
    assert_eq!(kinds(late.errors()), vec![("opens", ErrorKind::Range)]);
}

#[test]
fn test_json_report() {
    let schema = define_schema(
        vec![FieldBuilder::new("age", FieldType::Int).build()],
        Vec::new(),
    )
    .unwrap();

    let rejected = schema.validate_json(&serde_json::json!({ "age": "old" }));
    let json = rejected.to_json();
    assert_eq!(json["valid"], serde_json::json!(false));
    assert_eq!(json["summary"]["error_count"], serde_json::json!(1));
    assert_eq!(json["errors"][0]["kind"], serde_json::json!("coercion_error"));

    let accepted = schema.validate_json(&serde_json::json!({ "age": 30 }));
    assert_eq!(
        accepted.to_json(),
        serde_json::json!({ "valid": true, "record": { "age": 30 } })
    );
}

#[test]
fn test_concurrent_validation() {
    let schema = Arc::new(
        define_schema(
            vec![FieldBuilder::new("n", FieldType::Int).ge(0).build()],
            Vec::new(),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let value = if i % 2 == 0 { i } else { -i };
                schema
                    .validate(&input(&[("n", Value::Int(value))]))
                    .is_success()
            })
        })
        .collect();

    let outcomes: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        outcomes,
        vec![true, false, true, false, true, false, true, false]
    );
}

#[test]
fn test_record_export_matches_input_shape() {
    let schema = define_schema(
        vec![
            FieldBuilder::new("name", FieldType::String).build(),
            FieldBuilder::new("age", FieldType::Int).build(),
        ],
        Vec::new(),
    )
    .unwrap();

    let record: Record = schema
        .validate(&input(&[("age", Value::from("31")), ("name", Value::from("Ada"))]))
        .into_record()
        .unwrap();

    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"name":"Ada","age":31}"#
    );
}
