//! Schema definitions for the recordcheck framework.
//!
//! A [`Schema`] names the fields of one record type, in field order, with
//! their types. Which fields form the grouping key is derived from the field
//! types unless a field overrides it with `key: true|false`. Fields may also
//! carry a [`GeneratorConfig`] used by `record-generator`.
//!
//! ```yaml
//! name: orders
//! fields:
//!   - name: id
//!     type: int
//!     generator:
//!       type: sequential
//!       start: 1
//!   - name: amount
//!     type: double
//!     generator:
//!       type: float_range
//!       min: 0.0
//!       max: 100.0
//! ```

use crate::types::FieldType;
use crate::values::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Field not found in schema
    #[error("Field '{field}' not found in schema '{schema}'")]
    FieldNotFound { schema: String, field: String },

    /// Two fields share a name
    #[error("Duplicate field '{field}' in schema '{schema}'")]
    DuplicateField { schema: String, field: String },
}

// ============================================================================
// Generator Configuration
// ============================================================================

/// Generator configuration for a field.
///
/// This enum defines the different types of value generators available
/// for producing test records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4) from the seeded RNG
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index} and {rand:N})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (ISO 8601 or YYYY-MM-DD)
        start: String,
        /// End timestamp (ISO 8601 or YYYY-MM-DD)
        end: String,
    },

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: serde_yaml::Value,
    },

    /// Generate null values (for nullable fields)
    Null,
}

// ============================================================================
// Field and Schema
// ============================================================================

/// Definition of a single record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,

    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Explicit key membership; derived from the type when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<bool>,

    /// Whether this field may be null
    #[serde(default)]
    pub nullable: bool,

    /// Generator configuration for this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,
}

impl FieldSchema {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            key: None,
            nullable: false,
            generator: None,
        }
    }

    /// Override whether the field belongs to the grouping key.
    pub fn with_key(mut self, key: bool) -> Self {
        self.key = Some(key);
        self
    }

    /// Attach a generator.
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Mark the field as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Whether the field is part of the grouping key.
    pub fn is_key(&self) -> bool {
        self.key.unwrap_or_else(|| self.field_type.is_key_type())
    }
}

/// Schema of one record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, used in diagnostics
    #[serde(default)]
    pub name: String,

    /// Field definitions, in record field order
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    /// Create a schema from field definitions.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Create an unnamed schema with default key membership from field types.
    pub fn of_types(types: &[FieldType]) -> Self {
        Self {
            name: String::new(),
            fields: types
                .iter()
                .enumerate()
                .map(|(i, t)| FieldSchema::new(format!("f{i}"), *t))
                .collect(),
        }
    }

    /// Infer a schema from a sample record.
    ///
    /// Null fields are typed as text since no better information exists.
    pub fn infer(name: impl Into<String>, sample: &Record) -> Self {
        let types: Vec<FieldType> = sample
            .values()
            .iter()
            .map(|v| v.field_type().unwrap_or(FieldType::Text))
            .collect();
        let mut schema = Self::of_types(&types);
        schema.name = name.into();
        schema
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field definition by position.
    pub fn field(&self, index: usize) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    /// Get the type of the field at a position.
    pub fn field_type(&self, index: usize) -> Option<FieldType> {
        self.fields.get(index).map(|f| f.field_type)
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Result<usize, SchemaError> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                schema: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Positions of the fields that form the grouping key, in field order.
    pub fn key_indices(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_key())
            .map(|(i, _)| i)
            .collect()
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
