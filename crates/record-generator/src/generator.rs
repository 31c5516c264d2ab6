//! Main data generator for producing test records.

use crate::generators::generate_field_value;
use rand::rngs::StdRng;
use rand::SeedableRng;
use record_core::{FieldType, Record, Schema};
use tracing::debug;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Field has no generator and is not nullable
    #[error("Field '{field}' in schema '{schema}' has no generator")]
    MissingGenerator { schema: String, field: String },

    /// Generated value cannot be represented in the field type
    #[error("Cannot coerce generated value '{value}' to {target} for field '{field}'")]
    Coercion {
        field: String,
        value: String,
        target: FieldType,
    },

    /// Timestamp bounds could not be parsed
    #[error("Invalid timestamp '{0}' (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidTimestamp(String),

    /// Schema error
    #[error("Schema error: {0}")]
    SchemaError(#[from] record_core::SchemaError),
}

/// Data generator that produces deterministic test records.
///
/// The generator uses a seeded random number generator to ensure
/// reproducible results across runs with the same seed and schema.
pub struct DataGenerator {
    /// Schema defining the fields and their generators
    schema: Schema,
    /// Base seed, kept so the RNG can be repositioned
    seed: u64,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
    /// Current record index (for incremental generation)
    index: u64,
}

impl DataGenerator {
    /// Create a new data generator with the given schema and seed.
    pub fn new(schema: Schema, seed: u64) -> Self {
        debug!(
            "Creating generator for '{}' ({} fields, seed={seed})",
            schema.name,
            schema.fields.len()
        );
        Self {
            schema,
            seed,
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    /// Set the starting index for record generation.
    ///
    /// Note: This also re-seeds the RNG so that generation starting at the
    /// same index with the same seed always yields the same records.
    pub fn with_start_index(mut self, index: u64) -> Self {
        let rng_seed = self.compute_rng_seed_for_index(index);
        debug!(
            "Reseeding generator for '{}' at index {index} (rng seed {rng_seed:#x})",
            self.schema.name
        );
        self.index = index;
        self.rng = StdRng::seed_from_u64(rng_seed);
        self
    }

    fn compute_rng_seed_for_index(&self, index: u64) -> u64 {
        self.seed.wrapping_add(index.wrapping_mul(0x9E3779B97F4A7C15))
    }

    /// Seed the generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current record index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Generate the next record.
    pub fn next_record(&mut self) -> Result<Record, GeneratorError> {
        let index = self.index;
        let mut record = Record::new();

        for field in &self.schema.fields {
            let value = match &field.generator {
                Some(config) => generate_field_value(config, field, &mut self.rng, index)?,
                None if field.nullable => record_core::Value::Null,
                None => {
                    return Err(GeneratorError::MissingGenerator {
                        schema: self.schema.name.clone(),
                        field: field.name.clone(),
                    })
                }
            };
            record.push(value);
        }

        self.index += 1;
        Ok(record)
    }

    /// Generate multiple records.
    ///
    /// Returns an iterator that lazily generates records.
    pub fn records(&mut self, count: u64) -> RecordIterator<'_> {
        RecordIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Get a reference to the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Iterator that lazily generates records.
pub struct RecordIterator<'a> {
    generator: &'a mut DataGenerator,
    remaining: u64,
}

impl Iterator for RecordIterator<'_> {
    type Item = Result<Record, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use record_core::Value;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn test_schema() -> Schema {
        let yaml = r#"
name: users
fields:
  - name: id
    type: uuid
    generator:
      type: uuid_v4
  - name: email
    type: text
    generator:
      type: pattern
      pattern: "user_{index}@example.com"
  - name: age
    type: int
    generator:
      type: int_range
      min: 18
      max: 80
  - name: is_active
    type: bool
    generator:
      type: weighted_bool
      true_weight: 0.8
  - name: nickname
    type: text
    nullable: true
"#;
        Schema::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_generate_single_record() {
        let mut generator = DataGenerator::new(test_schema(), 42);

        let record = generator.next_record().unwrap();

        assert_eq!(record.len(), 5);
        assert!(matches!(record.field(0), Some(Value::Uuid(_))));
        assert_eq!(
            record.field(1),
            Some(&Value::Text("user_0@example.com".to_string()))
        );
        match record.field(2) {
            Some(Value::Int(age)) => assert!((18..=80).contains(age)),
            other => panic!("Expected Int for age, got {other:?}"),
        }
        assert!(matches!(record.field(3), Some(Value::Bool(_))));
        assert_eq!(record.field(4), Some(&Value::Null));
    }

    #[test]
    fn test_deterministic_generation() {
        let schema = test_schema();

        let mut gen1 = DataGenerator::new(schema.clone(), 42);
        let mut gen2 = DataGenerator::new(schema, 42);

        let a: Vec<Record> = gen1.records(20).collect::<Result<_, _>>().unwrap();
        let b: Vec<Record> = gen2.records(20).collect::<Result<_, _>>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let schema = test_schema();

        let a = DataGenerator::new(schema.clone(), 1).next_record().unwrap();
        let b = DataGenerator::new(schema, 2).next_record().unwrap();
        assert_ne!(a.field(0), b.field(0));
    }

    #[test]
    fn test_generate_multiple_records() {
        let mut generator = DataGenerator::new(test_schema(), 42);

        let records: Vec<_> = generator.records(10).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 10);

        for (i, record) in records.iter().enumerate() {
            assert_eq!(
                record.field(1).and_then(Value::as_str),
                Some(format!("user_{i}@example.com").as_str())
            );
        }
    }

    #[test]
    fn test_missing_generator() {
        let yaml = r#"
name: broken
fields:
  - name: id
    type: int
"#;
        let mut generator = DataGenerator::new(Schema::from_yaml(yaml).unwrap(), 42);
        let result = generator.next_record();
        assert!(matches!(
            result,
            Err(GeneratorError::MissingGenerator { .. })
        ));
    }

    #[test]
    fn test_with_start_index() {
        let mut generator = DataGenerator::new(test_schema(), 42).with_start_index(5);
        let record = generator.next_record().unwrap();
        assert_eq!(
            record.field(1).and_then(Value::as_str),
            Some("user_5@example.com")
        );

        let again = DataGenerator::new(test_schema(), 42)
            .with_start_index(5)
            .next_record()
            .unwrap();
        assert_eq!(record, again);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_start_index_reseed_is_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            DataGenerator::new(test_schema(), 42).with_start_index(7);
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Creating generator for 'users' (5 fields, seed=42)"));
        assert!(output.contains("Reseeding generator for 'users' at index 7"));
    }

    #[test]
    fn test_current_index() {
        let mut generator = DataGenerator::new(test_schema(), 42);

        assert_eq!(generator.current_index(), 0);
        generator.next_record().unwrap();
        assert_eq!(generator.current_index(), 1);
        generator.records(3).for_each(drop);
        assert_eq!(generator.current_index(), 4);
    }
}
