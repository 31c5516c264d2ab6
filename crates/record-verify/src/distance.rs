//! Approximate comparison of field values and whole records.
//!
//! A distance is a non-negative number, or [`NO_MATCH`] when two values
//! cannot match under any tolerance. Callers treat every non-negative
//! distance as a match; the magnitude only serves diagnostics.

use crate::config::TypeConfig;
use record_core::{FieldType, Record, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Distance reported for values that do not match.
pub const NO_MATCH: f64 = -1.0;

/// Approximate comparison of two values of one field.
pub trait ValueSimilarity: Send + Sync + fmt::Debug {
    /// Whether this similarity can compare values of `field_type`.
    fn is_applicable(&self, field_type: FieldType) -> bool;

    /// Distance between an expected and an actual value, or [`NO_MATCH`].
    fn distance(&self, expected: &Value, actual: &Value) -> f64;
}

/// Distance between two whole records under a type configuration.
pub trait TypeDistance: Send + Sync + fmt::Debug {
    fn distance(&self, config: &TypeConfig, expected: &Record, actual: &Record) -> f64;
}

/// Compare two values that are not both present as numbers.
///
/// Absent vs absent is an exact match, absent vs present never matches.
fn absent_or_exact(expected: &Value, actual: &Value) -> f64 {
    if expected == actual {
        0.0
    } else {
        NO_MATCH
    }
}

fn within(diff: f64, delta: f64) -> f64 {
    if diff <= delta {
        diff
    } else {
        NO_MATCH
    }
}

/// Matches doubles whose absolute difference is at most `delta`.
///
/// `NaN` matches only `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleValueSimilarity {
    delta: f64,
}

impl DoubleValueSimilarity {
    pub fn new(delta: f64) -> Self {
        Self { delta: delta.abs() }
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }
}

impl ValueSimilarity for DoubleValueSimilarity {
    fn is_applicable(&self, field_type: FieldType) -> bool {
        field_type == FieldType::Double
    }

    fn distance(&self, expected: &Value, actual: &Value) -> f64 {
        match (expected, actual) {
            (Value::Double(e), Value::Double(a)) if e.is_nan() || a.is_nan() => {
                if e.is_nan() && a.is_nan() {
                    0.0
                } else {
                    NO_MATCH
                }
            }
            (Value::Double(e), Value::Double(a)) if e == a => 0.0,
            (Value::Double(e), Value::Double(a)) => within((e - a).abs(), self.delta),
            _ => absent_or_exact(expected, actual),
        }
    }
}

/// Matches integers whose absolute difference is at most `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerValueSimilarity {
    delta: u64,
}

impl IntegerValueSimilarity {
    pub fn new(delta: u64) -> Self {
        Self { delta }
    }
}

impl ValueSimilarity for IntegerValueSimilarity {
    fn is_applicable(&self, field_type: FieldType) -> bool {
        field_type.is_integer()
    }

    fn distance(&self, expected: &Value, actual: &Value) -> f64 {
        match (expected.as_i64(), actual.as_i64()) {
            (Some(e), Some(a)) => {
                let diff = e.abs_diff(a);
                if diff <= self.delta {
                    diff as f64
                } else {
                    NO_MATCH
                }
            }
            _ => absent_or_exact(expected, actual),
        }
    }
}

/// Record distance built from per-field similarities.
///
/// Similarities are registered either for one field position or as
/// catch-alls that apply to every field of a matching type. A field with no
/// applicable similarity must be exactly equal; any difference there makes
/// the whole record [`NO_MATCH`]. A field with similarities contributes the
/// mean of their distances. The record distance is the sum over fields.
#[derive(Debug, Clone, Default)]
pub struct RecordDistance {
    field_similarities: BTreeMap<usize, Vec<Arc<dyn ValueSimilarity>>>,
    catch_all: Vec<Arc<dyn ValueSimilarity>>,
}

impl RecordDistance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a similarity for the field at `index`.
    pub fn add_field_similarity(&mut self, index: usize, similarity: Arc<dyn ValueSimilarity>) {
        self.field_similarities
            .entry(index)
            .or_default()
            .push(similarity);
    }

    /// Register a similarity for every field it is applicable to.
    pub fn add_similarity(&mut self, similarity: Arc<dyn ValueSimilarity>) {
        self.catch_all.push(similarity);
    }

    /// Whether any similarity is registered for the field at `index`.
    pub fn has_field_similarity(&self, index: usize) -> bool {
        self.field_similarities.contains_key(&index)
    }

    fn field_distance(
        &self,
        index: usize,
        field_type: FieldType,
        expected: &Value,
        actual: &Value,
    ) -> f64 {
        let specific = self
            .field_similarities
            .get(&index)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let general = self
            .catch_all
            .iter()
            .filter(|sim| sim.is_applicable(field_type));

        let mut sum = 0.0;
        let mut applied = 0usize;
        for sim in specific.iter().chain(general) {
            let d = sim.distance(expected, actual);
            if d < 0.0 {
                return NO_MATCH;
            }
            sum += d;
            applied += 1;
        }

        if applied == 0 {
            return absent_or_exact(expected, actual);
        }
        sum / applied as f64
    }
}

static ABSENT: Value = Value::Null;

impl TypeDistance for RecordDistance {
    fn distance(&self, config: &TypeConfig, expected: &Record, actual: &Record) -> f64 {
        let mut total = 0.0;
        for (index, field) in config.schema().fields.iter().enumerate() {
            let e = expected.present_field(index).unwrap_or(&ABSENT);
            let a = actual.present_field(index).unwrap_or(&ABSENT);
            let d = self.field_distance(index, field.field_type, e, a);
            if d < 0.0 {
                return NO_MATCH;
            }
            total += d;
        }
        total
    }
}
