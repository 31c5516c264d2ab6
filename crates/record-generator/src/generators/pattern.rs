//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - record index
//! - `{uuid}` - UUID drawn from the seeded RNG
//! - `{rand:N}` - random N-digit number

use rand::Rng;
use record_core::Value;

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> Value {
    let mut result = pattern.replace("{index}", &index.to_string());

    while let Some(pos) = result.find("{uuid}") {
        let uuid = super::uuid::random_uuid(rng).to_string();
        result.replace_range(pos..pos + "{uuid}".len(), &uuid);
    }

    // Unparseable {rand:...} placeholders are left as-is
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(close) = result[start..].find('}') else {
            break;
        };
        let end = start + close;
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let random_num = generate_random_digits(rng, digits);
                result.replace_range(start..=end, &random_num);
                search_from = start + random_num.len();
            }
            Err(_) => search_from = end + 1,
        }
    }

    Value::Text(result)
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    if digits == 0 {
        return String::new();
    }

    let mut result = String::with_capacity(digits);

    // First digit should be 1-9 to avoid leading zeros
    result.push(char::from(b'0' + rng.gen_range(1..10u8)));

    for _ in 1..digits {
        result.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }

    result
}
