//! Record generator for the recordcheck verification framework.
//!
//! This crate provides the `DataGenerator` which produces deterministic test
//! records based on a YAML schema. The generator uses a seeded RNG to ensure
//! reproducibility across runs with the same seed, so a generated stream can
//! stand in for a persisted fixture on either side of a comparison.
//!
//! # Architecture
//!
//! ```text
//! Schema (YAML)
//!        │
//!        ▼
//! ┌─────────────────┐
//! │  DataGenerator  │
//! │                 │
//! │  - seed         │
//! │  - rng (StdRng) │
//! │  - index        │
//! └────────┬────────┘
//!          │
//!          ▼
//!    Record (one value per schema field)
//! ```
//!
//! # Example
//!
//! ```rust
//! use record_generator::DataGenerator;
//! use record_core::Schema;
//!
//! let schema = Schema::from_yaml(r#"
//! name: users
//! fields:
//!   - name: id
//!     type: big_int
//!     generator:
//!       type: sequential
//!       start: 1
//!   - name: email
//!     type: text
//!     generator:
//!       type: pattern
//!       pattern: "user_{index}@example.com"
//! "#).unwrap();
//!
//! let mut generator = DataGenerator::new(schema, 42);
//! let record = generator.next_record().unwrap();
//! assert_eq!(record.to_string(), "(1, user_0@example.com)");
//! ```
//!
//! # Generators
//!
//! The following generator types are supported:
//!
//! - `uuid_v4` - UUID v4 drawn from the seeded RNG
//! - `sequential` - Sequential integers
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `timestamp_range` - Random timestamps in a date range
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `static` - Static value
//! - `null` - Null value
//!
//! Generated values are coerced to the declared field type, so an
//! `int_range` generator on a `double` field yields doubles.

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{DataGenerator, GeneratorError, RecordIterator};
