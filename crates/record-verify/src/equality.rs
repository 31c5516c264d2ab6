//! Record equality strategies.

use record_core::{Record, Schema};
use std::fmt;

/// Decides whether two records of one schema are the same value.
///
/// Implementations must be reflexive and symmetric.
pub trait Equaler: Send + Sync + fmt::Debug {
    fn equal(&self, a: &Record, b: &Record) -> bool;
}

/// Field-by-field equality over the fields of a schema.
///
/// Null and missing fields are both absent: absence equals absence and never
/// equals a present value. Fields past the schema are ignored.
#[derive(Debug, Clone)]
pub struct SchemaEqualer {
    field_count: usize,
}

impl SchemaEqualer {
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            field_count: schema.len(),
        }
    }
}

impl Equaler for SchemaEqualer {
    fn equal(&self, a: &Record, b: &Record) -> bool {
        (0..self.field_count).all(|i| a.present_field(i) == b.present_field(i))
    }
}
