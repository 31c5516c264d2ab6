//! Field types for recordcheck schemas.
//!
//! This module defines `FieldType`, the type universe a record field can take.
//! The verifier uses it to decide which fields form the grouping key and which
//! similarity measures apply to a field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a single record field.
///
/// # YAML Format
///
/// Types are written as snake-case strings:
/// ```yaml
/// type: int
/// type: big_int
/// type: double
/// type: date_time
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Boolean value
    Bool,

    /// 32-bit signed integer
    #[serde(alias = "int32")]
    Int,

    /// 64-bit signed integer
    #[serde(alias = "int64", alias = "bigint")]
    BigInt,

    /// 64-bit IEEE 754 floating point
    #[serde(alias = "float64", alias = "float")]
    Double,

    /// Unlimited text
    #[serde(alias = "string")]
    Text,

    /// Binary data
    Bytes,

    /// UUID (128-bit)
    Uuid,

    /// Timestamp with UTC timezone
    #[serde(alias = "datetime", alias = "timestamp")]
    DateTime,
}

impl FieldType {
    /// Whether values of this type participate in the default grouping key.
    ///
    /// Every type except raw bytes is orderable in a meaningful way.
    pub fn is_key_type(&self) -> bool {
        !matches!(self, Self::Bytes)
    }

    /// Check if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::BigInt | Self::Double)
    }

    /// Check if this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int | Self::BigInt)
    }

    /// Name as written in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::BigInt => "big_int",
            Self::Double => "double",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::DateTime => "date_time",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_categories() {
        assert!(FieldType::Int.is_numeric());
        assert!(FieldType::BigInt.is_numeric());
        assert!(FieldType::Double.is_numeric());
        assert!(!FieldType::Text.is_numeric());

        assert!(FieldType::Int.is_integer());
        assert!(!FieldType::Double.is_integer());

        assert!(FieldType::Double.is_key_type());
        assert!(FieldType::Text.is_key_type());
        assert!(!FieldType::Bytes.is_key_type());
    }

    #[test]
    fn test_deserialize_simple_string() {
        let t: FieldType = serde_yaml::from_str("int").unwrap();
        assert_eq!(t, FieldType::Int);

        let t: FieldType = serde_yaml::from_str("big_int").unwrap();
        assert_eq!(t, FieldType::BigInt);

        let t: FieldType = serde_yaml::from_str("float64").unwrap();
        assert_eq!(t, FieldType::Double);

        let t: FieldType = serde_yaml::from_str("timestamp").unwrap();
        assert_eq!(t, FieldType::DateTime);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<FieldType, _> = serde_yaml::from_str("geometry");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_uses_schema_name() {
        assert_eq!(FieldType::DateTime.to_string(), "date_time");
        assert_eq!(FieldType::BigInt.to_string(), "big_int");
    }
}
