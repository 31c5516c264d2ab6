//! Timestamp value generators.

use crate::generator::GeneratorError;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use record_core::Value;

/// Generate a random timestamp (second precision) in the given range.
///
/// Bounds are RFC 3339 timestamps or `YYYY-MM-DD` dates. A range whose
/// start is not before its end always yields the start.
pub fn generate_timestamp_range<R: Rng>(
    rng: &mut R,
    start: &str,
    end: &str,
) -> Result<Value, GeneratorError> {
    let start_dt =
        parse_timestamp(start).ok_or_else(|| GeneratorError::InvalidTimestamp(start.into()))?;
    let end_dt = parse_timestamp(end).ok_or_else(|| GeneratorError::InvalidTimestamp(end.into()))?;

    let start_ts = start_dt.timestamp();
    let end_ts = end_dt.timestamp();
    if start_ts >= end_ts {
        return Ok(Value::DateTime(start_dt));
    }

    let random_ts = rng.gen_range(start_ts..=end_ts);
    let dt = DateTime::from_timestamp(random_ts, 0).unwrap_or(start_dt);
    Ok(Value::DateTime(dt))
}

/// Parse a timestamp string in RFC 3339 or date-only format.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_timestamp_range() {
        let mut rng = StdRng::seed_from_u64(42);

        let value =
            generate_timestamp_range(&mut rng, "2020-01-01T00:00:00Z", "2024-12-31T23:59:59Z")
                .unwrap();

        match value {
            Value::DateTime(dt) => assert!(dt.year() >= 2020 && dt.year() <= 2024),
            other => panic!("Expected DateTime value, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_timestamp_with_dates_only() {
        let mut rng = StdRng::seed_from_u64(42);

        let value = generate_timestamp_range(&mut rng, "2020-01-01", "2024-12-31").unwrap();

        match value {
            Value::DateTime(dt) => assert!(dt.year() >= 2020 && dt.year() <= 2024),
            other => panic!("Expected DateTime value, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_bound_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = generate_timestamp_range(&mut rng, "yesterday", "2024-12-31");
        assert!(matches!(result, Err(GeneratorError::InvalidTimestamp(_))));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let value1 = generate_timestamp_range(&mut rng1, "2020-01-01", "2024-12-31").unwrap();
        let value2 = generate_timestamp_range(&mut rng2, "2020-01-01", "2024-12-31").unwrap();

        assert_eq!(value1, value2);
    }
}
