//! Core types for the recordcheck verification framework.
//!
//! This crate provides the foundational types shared by the generator and
//! the verifier:
//!
//! - [`FieldType`] - The type universe of a record field
//! - [`Value`] - A single, totally ordered field value
//! - [`Record`] - An ordered tuple of field values
//! - [`Schema`] - Field definitions loaded from YAML
//!
//! # Architecture
//!
//! ```text
//! record-core (this crate)
//!    │
//!    ├─── record-generator   (depends on record-core for schema + values)
//!    │
//!    └─── record-verify      (keys, equality, distance and matching over Records)
//! ```
//!
//! # Example
//!
//! ```rust
//! use record_core::{Record, Value};
//!
//! let record = Record::from_values(vec![Value::Int(1), Value::Text("a".into())]);
//! assert_eq!(record.len(), 2);
//! assert_eq!(record.to_string(), "(1, a)");
//! ```

pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use schema::{FieldSchema, GeneratorConfig, Schema, SchemaError};
pub use types::FieldType;
pub use values::{Record, RecordBuilder, Value};
