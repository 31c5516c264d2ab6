//! Individual value generators for different data types.
//!
//! This module provides the generation logic for each type of value
//! based on the generator configuration from the schema. Generators produce
//! a value in their natural representation; [`coerce_to_field_type`] then
//! converts it to the declared field type.

pub mod numeric;
pub mod pattern;
pub mod static_value;
pub mod timestamp;
pub mod uuid;

use crate::generator::GeneratorError;
use chrono::DateTime;
use rand::Rng;
use record_core::{FieldSchema, FieldType, GeneratorConfig, Value};

/// Generate a value for a field and coerce it to the field type.
pub fn generate_field_value<R: Rng>(
    config: &GeneratorConfig,
    field: &FieldSchema,
    rng: &mut R,
    index: u64,
) -> Result<Value, GeneratorError> {
    let raw = generate_value(config, rng, index)?;
    coerce_to_field_type(raw, field)
}

/// Generate a value based on the generator configuration.
pub fn generate_value<R: Rng>(
    config: &GeneratorConfig,
    rng: &mut R,
    index: u64,
) -> Result<Value, GeneratorError> {
    let value = match config {
        GeneratorConfig::UuidV4 => uuid::generate_uuid_v4(rng),

        GeneratorConfig::Sequential { start } => Value::BigInt(start + index as i64),

        GeneratorConfig::Pattern { pattern } => pattern::generate_pattern(pattern, rng, index),

        GeneratorConfig::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),

        GeneratorConfig::FloatRange { min, max } => numeric::generate_float_range(rng, *min, *max),

        GeneratorConfig::TimestampRange { start, end } => {
            timestamp::generate_timestamp_range(rng, start, end)?
        }

        GeneratorConfig::WeightedBool { true_weight } => {
            Value::Bool(rng.gen_bool(true_weight.clamp(0.0, 1.0)))
        }

        GeneratorConfig::OneOf { values } => {
            if values.is_empty() {
                Value::Null
            } else {
                let idx = rng.gen_range(0..values.len());
                static_value::yaml_to_value(&values[idx])
            }
        }

        GeneratorConfig::Static { value } => static_value::yaml_to_value(value),

        GeneratorConfig::Null => Value::Null,
    };
    Ok(value)
}

/// Convert a generated value to the declared type of its field.
///
/// Null passes through unchanged. Lossy conversions (a double into an
/// integer field, an out-of-range big int into an int field) are rejected.
pub fn coerce_to_field_type(value: Value, field: &FieldSchema) -> Result<Value, GeneratorError> {
    let target = field.field_type;
    if value.is_null() || value.field_type() == Some(target) {
        return Ok(value);
    }

    let coerced = match (target, &value) {
        (FieldType::Int, Value::BigInt(i)) => i32::try_from(*i).ok().map(Value::Int),
        (FieldType::BigInt, Value::Int(i)) => Some(Value::BigInt(*i as i64)),
        (FieldType::Double, v) => v.as_i64().map(|i| Value::Double(i as f64)),
        (FieldType::Text, v) => Some(Value::Text(v.to_string())),
        (FieldType::Bytes, Value::Text(s)) => Some(Value::Bytes(s.as_bytes().to_vec())),
        (FieldType::Uuid, Value::Text(s)) => s.parse().ok().map(Value::Uuid),
        (FieldType::DateTime, Value::Text(s)) => timestamp::parse_timestamp(s).map(Value::DateTime),
        (FieldType::DateTime, Value::BigInt(secs)) => {
            DateTime::from_timestamp(*secs, 0).map(Value::DateTime)
        }
        (FieldType::Bool, Value::Text(s)) => s.parse().ok().map(Value::Bool),
        _ => None,
    };

    coerced.ok_or_else(|| GeneratorError::Coercion {
        field: field.name.clone(),
        value: value.to_string(),
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(field_type: FieldType) -> FieldSchema {
        FieldSchema::new("f", field_type)
    }

    #[test]
    fn test_sequential_uses_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::Sequential { start: 100 };
        assert_eq!(
            generate_value(&config, &mut rng, 7).unwrap(),
            Value::BigInt(107)
        );
    }

    #[test]
    fn test_coerce_integer_widths() {
        assert_eq!(
            coerce_to_field_type(Value::BigInt(5), &field(FieldType::Int)).unwrap(),
            Value::Int(5)
        );
        assert!(matches!(
            coerce_to_field_type(Value::BigInt(i64::MAX), &field(FieldType::Int)),
            Err(GeneratorError::Coercion { .. })
        ));
        assert_eq!(
            coerce_to_field_type(Value::Int(5), &field(FieldType::BigInt)).unwrap(),
            Value::BigInt(5)
        );
    }

    #[test]
    fn test_coerce_int_to_double() {
        assert_eq!(
            coerce_to_field_type(Value::BigInt(3), &field(FieldType::Double)).unwrap(),
            Value::Double(3.0)
        );
    }

    #[test]
    fn test_coerce_double_to_int_rejected() {
        let result = coerce_to_field_type(Value::Double(1.5), &field(FieldType::BigInt));
        assert!(matches!(result, Err(GeneratorError::Coercion { .. })));
    }

    #[test]
    fn test_coerce_text_targets() {
        assert_eq!(
            coerce_to_field_type(Value::BigInt(9), &field(FieldType::Text)).unwrap(),
            Value::Text("9".to_string())
        );
        let uuid = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert!(matches!(
            coerce_to_field_type(Value::Text(uuid.to_string()), &field(FieldType::Uuid)),
            Ok(Value::Uuid(_))
        ));
        assert!(matches!(
            coerce_to_field_type(
                Value::Text("2024-01-01".to_string()),
                &field(FieldType::DateTime)
            ),
            Ok(Value::DateTime(_))
        ));
    }

    #[test]
    fn test_null_passes_through() {
        assert_eq!(
            coerce_to_field_type(Value::Null, &field(FieldType::Uuid)).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_one_of_empty_pool_is_null() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = GeneratorConfig::OneOf { values: vec![] };
        assert_eq!(generate_value(&config, &mut rng, 0).unwrap(), Value::Null);
    }
}
