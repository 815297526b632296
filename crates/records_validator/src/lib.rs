//! # Records Validator
//!
//! Validation engine for record schemas. This crate compiles a
//! [`SchemaDefinition`](records_core::SchemaDefinition) into an immutable
//! [`Schema`] and validates raw input mappings against it:
//!
//! - Type coercion (string parsing for numbers, booleans and temporal values)
//! - Constraint evaluation (numeric and temporal bounds, lengths, patterns)
//! - Custom field validators before and after coercion
//! - Whole-record validators run once every field is valid
//!
//! ## Example
//!
//! ```rust
//! use records_core::{FieldBuilder, FieldType, SchemaBuilder, ValidatorError, Value};
//! use records_validator::Schema;
//! use std::collections::HashMap;
//!
//! let definition = SchemaBuilder::new("signup")
//!     .field(FieldBuilder::new("password", FieldType::String).min_length(8).build())
//!     .field(FieldBuilder::new("confirm", FieldType::String).build())
//!     .record_validator(|record| {
//!         if record.get("password") == record.get("confirm") {
//!             Ok(record)
//!         } else {
//!             Err(ValidatorError::new("passwords do not match"))
//!         }
//!     })
//!     .build();
//! let schema = Schema::compile(definition).unwrap();
//!
//! let input = HashMap::from([
//!     ("password".to_string(), Value::from("correct horse")),
//!     ("confirm".to_string(), Value::from("battery staple")),
//! ]);
//!
//! let result = schema.validate(&input);
//! if result.is_success() {
//!     println!("Validation passed!");
//! } else {
//!     println!("Validation failed:\n{}", result.report());
//! }
//! ```

mod coercion;
mod constraints;
mod cross_field;
mod custom;
mod engine;
mod error;
mod schema;

pub use coercion::*;
pub use constraints::*;
pub use engine::*;
pub use error::*;
pub use schema::*;
