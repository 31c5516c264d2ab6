//! Static value generator and YAML to `Value` conversion.

use record_core::Value;
use serde_yaml::Value as YamlValue;

/// Convert a YAML scalar to a `Value`.
///
/// Integers become big ints and other numbers doubles; the caller coerces
/// them to the field type. Sequences and mappings have no record
/// representation and are rendered as their YAML text.
pub fn yaml_to_value(yaml: &YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::BigInt(i)
            } else if let Some(f) = n.as_f64() {
                Value::Double(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        YamlValue::String(s) => Value::Text(s.clone()),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            Value::Text(serde_yaml::to_string(yaml).unwrap_or_default().trim_end().to_string())
        }
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value),
    }
}
