//! # Records Core
//!
//! Core data structures and types for the Records schema engine.
//!
//! This crate provides the building blocks for declaring record schemas and
//! for describing the outcome of validating raw input against them. The
//! validation engine itself lives in `records_validator`.
//!
//! ## Key Concepts
//!
//! - **Value**: dynamically typed input or output value
//! - **FieldSpec**: a field's name, declared type, constraints, default and validators
//! - **SchemaDefinition**: ordered fields plus whole-record validators and options
//! - **ValidationResult**: either a coerced [`Record`] or a non-empty list of
//!   [`ValidationError`]s
//!
//! ## Example
//!
//! ```rust
//! use records_core::{FieldBuilder, FieldType, SchemaBuilder};
//!
//! let definition = SchemaBuilder::new("signup")
//!     .field(
//!         FieldBuilder::new("age", FieldType::Int)
//!             .ge(18)
//!             .le(60)
//!             .build(),
//!     )
//!     .field(
//!         FieldBuilder::new("email", FieldType::String)
//!             .pattern(r"^\S+@\S+\.\S+$")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(definition.fields.len(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod field;
pub mod record;
pub mod report;
pub mod schema;
pub mod validator;
pub mod value;

pub use builder::*;
pub use error::*;
pub use field::*;
pub use record::*;
pub use report::*;
pub use schema::*;
pub use validator::*;
pub use value::*;
