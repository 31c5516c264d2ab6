//! Value and record representations for the recordcheck framework.
//!
//! A [`Record`] is an ordered tuple of [`Value`]s whose meaning is given by a
//! [`Schema`](crate::Schema). Records are plain owned data: cloning a record
//! is a deep copy, never an alias.

use crate::types::FieldType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// A single field value.
///
/// Values are totally ordered so that they can serve as grouping keys.
/// Values of different variants order by variant (null first); doubles use
/// the IEEE 754 total order, which makes `NaN` equal to itself and keeps
/// `Eq` consistent with `Ord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// 32-bit signed integer
    Int(i32),

    /// 64-bit signed integer
    BigInt(i64),

    /// 64-bit floating point
    Double(f64),

    /// String value
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Date/time with timezone
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The field type this value belongs to, `None` for null.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(FieldType::Bool),
            Self::Int(_) => Some(FieldType::Int),
            Self::BigInt(_) => Some(FieldType::BigInt),
            Self::Double(_) => Some(FieldType::Double),
            Self::Text(_) => Some(FieldType::Text),
            Self::Bytes(_) => Some(FieldType::Bytes),
            Self::Uuid(_) => Some(FieldType::Uuid),
            Self::DateTime(_) => Some(FieldType::DateTime),
        }
    }

    /// Try to get this value as an i64 (widening 32-bit integers).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i as i64),
            Self::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::BigInt(_) => 3,
            Self::Double(_) => 4,
            Self::Text(_) => 5,
            Self::Bytes(_) => 6,
            Self::Uuid(_) => 7,
            Self::DateTime(_) => 8,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::BigInt(a), Self::BigInt(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bytes(a), Self::Bytes(b)) => a.cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Self::Uuid(u) => write!(f, "{u}"),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A single record: an ordered tuple of field values.
///
/// Field `i` of the record corresponds to field `i` of its schema. A field
/// past the end of the record reads as absent, the same as an explicit null.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Vec<Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from its field values.
    pub fn from_values(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Start building a record field by field.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Number of fields physically present.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field value by index.
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Get a field value by index, treating null as absent.
    pub fn present_field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).filter(|v| !v.is_null())
    }

    /// Set a field, padding any gap with nulls.
    pub fn set_field(&mut self, index: usize, value: Value) {
        if index >= self.fields.len() {
            self.fields.resize(index + 1, Value::Null);
        }
        self.fields[index] = value;
    }

    /// Append a field.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.fields.push(value.into());
    }

    /// Remove all fields, keeping the allocation.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// All field values.
    pub fn values(&self) -> &[Value] {
        &self.fields
    }

    /// Consume the record, returning its field values.
    pub fn into_values(self) -> Vec<Value> {
        self.fields
    }
}

impl From<Vec<Value>> for Record {
    fn from(fields: Vec<Value>) -> Self {
        Self::from_values(fields)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

/// Builder for `Record`.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Vec<Value>,
}

impl RecordBuilder {
    /// Append a field to the record.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.fields.push(value.into());
        self
    }

    /// Append a null field.
    pub fn null(mut self) -> Self {
        self.fields.push(Value::Null);
        self
    }

    /// Build the record.
    pub fn build(self) -> Record {
        Record {
            fields: self.fields,
        }
    }
}

/// Build a [`Record`] from a list of values convertible into [`Value`].
///
/// ```rust
/// use record_core::{record, Value};
///
/// let r = record![1, "a", 2.5];
/// assert_eq!(r.field(1), Some(&Value::Text("a".into())));
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Record::from_values(vec![$($crate::Value::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ordering_within_variant() {
        assert!(Value::Int(1) < Value::Int(2));
        assert!(Value::Text("a".into()) < Value::Text("b".into()));
        assert!(Value::Double(-1.5) < Value::Double(0.0));
    }

    #[test]
    fn test_value_ordering_across_variants() {
        assert!(Value::Null < Value::Bool(false));
        assert!(Value::Int(100) < Value::Text("0".into()));
    }

    #[test]
    fn test_nan_equals_itself() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(f64::NAN), Value::Double(1.0));
    }

    #[test]
    fn test_present_field_treats_null_as_absent() {
        let r = Record::builder().value(1).null().build();
        assert_eq!(r.present_field(0), Some(&Value::Int(1)));
        assert_eq!(r.present_field(1), None);
        assert_eq!(r.present_field(7), None);
        assert_eq!(r.field(1), Some(&Value::Null));
    }

    #[test]
    fn test_set_field_pads_with_null() {
        let mut r = Record::new();
        r.set_field(2, Value::Bool(true));
        assert_eq!(r.len(), 3);
        assert_eq!(r.field(0), Some(&Value::Null));
        assert_eq!(r.field(2), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_record_display() {
        let r = record![1, "a", 50.5];
        assert_eq!(r.to_string(), "(1, a, 50.5)");
        assert_eq!(Record::new().to_string(), "()");
    }

    #[test]
    fn test_bytes_display_hex() {
        assert_eq!(Value::Bytes(vec![0x0a, 0xff]).to_string(), "0x0aff");
    }

    #[test]
    fn test_record_json_keeps_types() {
        let r = record![1, 1i64, 1.0, "1"];
        let json = serde_json::to_string(&r).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.field(0), Some(&Value::Int(1)));
        assert_eq!(back.field(1), Some(&Value::BigInt(1)));
        assert_eq!(back.field(2), Some(&Value::Double(1.0)));
        assert_eq!(back.field(3), Some(&Value::Text("1".into())));
    }

    #[test]
    fn test_option_into_value() {
        let none: Option<i32> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }
}
