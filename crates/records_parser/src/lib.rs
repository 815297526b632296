//! Parser for declarative Records schema definitions (YAML/TOML formats).
//!
//! This crate reads schema definitions from YAML and TOML documents into a
//! [`SchemaBuilder`]. Custom validators are code, so they are attached to the
//! returned builder in Rust before compiling it.
//!
//! # Example
//!
//! ```rust
//! use records_parser::parse_yaml;
//! use records_validator::Schema;
//!
//! let yaml = r#"
//! name: signup
//! extra: forbid
//! fields:
//!   - name: age
//!     type: int
//!     description: Age in years
//!     constraints: { ge: 18, le: 60 }
//!   - name: email
//!     type: str
//!     constraints:
//!       pattern: '^\S+@\S+\.\S+$'
//! "#;
//!
//! let builder = parse_yaml(yaml).expect("Failed to parse schema");
//! let schema = Schema::compile(builder.build()).expect("Invalid schema");
//! assert_eq!(schema.name(), "signup");
//! assert_eq!(schema.len(), 2);
//! ```

use records_core::{
    ExtraPolicy, FieldBuilder, FieldSpec, FieldType, SchemaBuilder, SchemaDefinitionError, Value,
};
use records_validator::Schema;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a schema definition.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// A field declaration combines settings that exclude each other
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// The document is well-formed but does not describe a valid schema
    #[error("Invalid schema definition: {0}")]
    Definition(#[from] SchemaDefinitionError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    name: String,
    #[serde(default)]
    extra: ExtraSetting,
    #[serde(default)]
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ExtraSetting {
    #[default]
    Ignore,
    Forbid,
}

impl From<ExtraSetting> for ExtraPolicy {
    fn from(setting: ExtraSetting) -> Self {
        match setting {
            ExtraSetting::Ignore => ExtraPolicy::Ignore,
            ExtraSetting::Forbid => ExtraPolicy::Forbid,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDocument {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    description: Option<String>,
    required: Option<bool>,
    default: Option<serde_json::Value>,
    #[serde(default)]
    constraints: ConstraintDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConstraintDocument {
    gt: Option<serde_json::Value>,
    ge: Option<serde_json::Value>,
    lt: Option<serde_json::Value>,
    le: Option<serde_json::Value>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<String>,
    pattern_partial: Option<String>,
}

impl SchemaDocument {
    fn into_builder(self) -> Result<SchemaBuilder> {
        let fields = self
            .fields
            .into_iter()
            .map(FieldDocument::into_spec)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Parsed schema definition '{}' with {} fields",
            self.name,
            fields.len()
        );

        Ok(SchemaBuilder::new(self.name)
            .fields(fields)
            .extra(self.extra.into()))
    }
}

impl FieldDocument {
    fn into_spec(self) -> Result<FieldSpec> {
        let field_type: FieldType = self.field_type.parse()?;
        let invalid = |message: &str| ParserError::InvalidField {
            field: self.name.clone(),
            message: message.to_string(),
        };

        let c = &self.constraints;
        if c.pattern.is_some() && c.pattern_partial.is_some() {
            return Err(invalid("'pattern' and 'pattern_partial' are mutually exclusive"));
        }

        let mut builder = FieldBuilder::new(self.name.clone(), field_type.clone());
        match (self.required, &self.default) {
            (Some(true), Some(_)) => {
                return Err(invalid("a required field cannot declare a default"));
            }
            (Some(false), None) if !field_type.is_optional() => {
                return Err(invalid(
                    "a non-optional field that is not required needs a default",
                ));
            }
            (Some(true), None) => builder = builder.required(),
            (_, Some(default)) => builder = builder.default(Value::from(default)),
            _ => {}
        }

        if let Some(description) = self.description {
            builder = builder.description(description);
        }

        let c = self.constraints;
        if let Some(bound) = c.gt {
            builder = builder.gt(Value::from(bound));
        }
        if let Some(bound) = c.ge {
            builder = builder.ge(Value::from(bound));
        }
        if let Some(bound) = c.lt {
            builder = builder.lt(Value::from(bound));
        }
        if let Some(bound) = c.le {
            builder = builder.le(Value::from(bound));
        }
        if let Some(min) = c.min_length {
            builder = builder.min_length(min);
        }
        if let Some(max) = c.max_length {
            builder = builder.max_length(max);
        }
        if let Some(pattern) = c.pattern {
            builder = builder.pattern(pattern);
        }
        if let Some(pattern) = c.pattern_partial {
            builder = builder.pattern_partial(pattern);
        }

        Ok(builder.build())
    }
}

/// Parse a schema definition from a YAML string.
///
/// # Example
///
/// ```rust
/// use records_parser::parse_yaml;
///
/// let yaml = r#"
/// name: prices
/// fields:
///   - name: price
///     type: float
///     constraints: { gt: 0 }
/// "#;
///
/// let builder = parse_yaml(yaml).unwrap();
/// assert_eq!(builder.declared_fields()[0].name, "price");
/// ```
pub fn parse_yaml(content: &str) -> Result<SchemaBuilder> {
    let document: SchemaDocument = serde_yaml_ng::from_str(content)?;
    document.into_builder()
}

/// Parse a schema definition from a TOML string.
///
/// Temporal bounds and defaults must be quoted strings.
///
/// # Example
///
/// ```rust
/// use records_parser::parse_toml;
///
/// let toml = r#"
/// name = "prices"
///
/// [[fields]]
/// name = "price"
/// type = "float"
/// constraints = { gt = 0 }
/// "#;
///
/// let builder = parse_toml(toml).unwrap();
/// assert_eq!(builder.declared_fields()[0].name, "price");
/// ```
pub fn parse_toml(content: &str) -> Result<SchemaBuilder> {
    let document: SchemaDocument =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    document.into_builder()
}

/// Detect the schema format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `SchemaFormat::Yaml`
/// * `.toml` → `SchemaFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema definition from a file with automatic format detection.
///
/// ```no_run
/// use records_parser::parse_file;
/// use std::path::Path;
///
/// let builder = parse_file(Path::new("schemas/signup.yml")).unwrap();
/// println!("Loaded {} fields", builder.declared_fields().len());
/// ```
pub fn parse_file(path: &Path) -> Result<SchemaBuilder> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    debug!("Loading {:?} schema definition from {}", format, path.display());

    match format {
        SchemaFormat::Yaml => parse_yaml(&content),
        SchemaFormat::Toml => parse_toml(&content),
    }
}

/// Parse and compile a schema file that needs no custom validators.
pub fn load_file(path: &Path) -> Result<Schema> {
    let builder = parse_file(path)?;
    Ok(Schema::compile(builder.build())?)
}
