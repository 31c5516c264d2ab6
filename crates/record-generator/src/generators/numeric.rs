//! Numeric value generators.

use rand::Rng;
use record_core::Value;

/// Generate a random integer in the given range (inclusive).
///
/// Reversed bounds are swapped rather than panicking.
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    Value::BigInt(rng.gen_range(lo..=hi))
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    if min >= max {
        return Value::Double(min);
    }
    Value::Double(rng.gen_range(min..=max))
}
