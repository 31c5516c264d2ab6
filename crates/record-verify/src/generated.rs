//! Record readers backed by the deterministic data generator.

use crate::input::RecordReader;
use record_core::{Record, Schema};
use record_generator::DataGenerator;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Produces a fresh reader each time a generated source is iterated.
///
/// Generated sources can be viewed more than once, so the factory must
/// yield the same records on every call.
pub type GeneratorFactory = Arc<dyn Fn() -> Box<dyn RecordReader> + Send + Sync>;

/// Reads `count` records from a [`DataGenerator`].
pub struct GeneratorReader {
    generator: DataGenerator,
    remaining: u64,
    description: String,
}

impl GeneratorReader {
    pub fn new(generator: DataGenerator, count: u64) -> Self {
        let description = format!(
            "generator '{}' (seed {}, {count} records)",
            generator.schema().name,
            generator.seed()
        );
        Self {
            generator,
            remaining: count,
            description,
        }
    }
}

impl fmt::Debug for GeneratorReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorReader")
            .field("description", &self.description)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl RecordReader for GeneratorReader {
    fn reached_end(&self) -> bool {
        self.remaining == 0
    }

    fn next_record(&mut self, target: &mut Record) -> io::Result<bool> {
        if self.remaining == 0 {
            return Ok(false);
        }
        *target = self.generator.next_record().map_err(io::Error::other)?;
        self.remaining -= 1;
        Ok(true)
    }

    fn close(&mut self) -> io::Result<()> {
        self.remaining = 0;
        Ok(())
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Factory for `count` records of `schema` generated from `seed`.
pub fn generator_factory(schema: Schema, seed: u64, count: u64) -> GeneratorFactory {
    let schema = Arc::new(schema);
    Arc::new(move || {
        let generator = DataGenerator::new((*schema).clone(), seed);
        Box::new(GeneratorReader::new(generator, count)) as Box<dyn RecordReader>
    })
}
