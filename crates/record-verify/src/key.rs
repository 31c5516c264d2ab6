//! Projection of records onto their grouping key.

use record_core::{Record, Schema, Value};
use std::cmp::Ordering;
use std::fmt;

/// Projects a record onto an ordered tuple of key fields.
///
/// The key is the list of schema positions it reads, in schema order. Two
/// records with equal keys belong to the same group; records are ordered by
/// comparing their key tuples element-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyExtractor {
    indices: Vec<usize>,
}

impl KeyExtractor {
    /// Key over explicit field positions.
    pub fn new(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    /// Key over every key-typed field of a schema.
    pub fn for_schema(schema: &Schema) -> Self {
        Self::new(schema.key_indices())
    }

    /// Number of key components.
    pub fn key_size(&self) -> usize {
        self.indices.len()
    }

    /// Field positions in key order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Write the key of `record` into `buffer`, which must hold `key_size()`
    /// values. Absent fields project to null.
    pub fn fill(&self, buffer: &mut [Value], record: &Record) {
        debug_assert_eq!(buffer.len(), self.key_size());
        for (slot, &index) in buffer.iter_mut().zip(&self.indices) {
            *slot = key_value(record, index);
        }
    }

    /// The key of `record` as an owned tuple.
    pub fn extract(&self, record: &Record) -> Vec<Value> {
        self.indices
            .iter()
            .map(|&index| key_value(record, index))
            .collect()
    }

    /// Stop treating a field as a key component. Removing a field that is
    /// not part of the key does nothing.
    pub fn remove_key(&mut self, index: usize) {
        self.indices.retain(|&i| i != index);
    }

    /// Order two records by their keys.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for &index in &self.indices {
            let ordering = key_ref(a, index).cmp(key_ref(b, index));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Whether `record` has the given key.
    pub fn has_key(&self, record: &Record, key: &[Value]) -> bool {
        self.indices
            .iter()
            .zip(key)
            .all(|(&index, value)| key_ref(record, index) == value)
    }
}

static NULL: Value = Value::Null;

fn key_ref(record: &Record, index: usize) -> &Value {
    record.field(index).unwrap_or(&NULL)
}

fn key_value(record: &Record, index: usize) -> Value {
    key_ref(record, index).clone()
}

/// Display wrapper rendering a key tuple as `[a, b]`.
pub struct DisplayKey<'a>(pub &'a [Value]);

impl fmt::Display for DisplayKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
