//! recordcheck library
//!
//! Command implementations behind the `recordcheck` binary. Each command
//! takes the argument struct defined in `record_verify::args` and reports
//! failures through `anyhow` with context describing the step that failed.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate a deterministic fixture
//! recordcheck generate --schema events.yaml --seed 7 --count 10000 --output expected.jsonl
//!
//! # Compare a job's output directory with the fixture
//! recordcheck verify --schema events.yaml --expected expected.jsonl --actual out/ \
//!   --double-delta 0.001
//!
//! # Sort a fixture by key under a small memory budget
//! recordcheck sort --schema events.yaml --input out/ --output sorted.jsonl \
//!   --memory-budget 1048576
//! ```

use anyhow::Context;
use record_core::Schema;
use record_generator::DataGenerator;
use record_verify::{
    GenerateArgs, RecordSource, SequentialOutputFormat, SortArgs, TypeConfig, VerificationReport,
    VerifyArgs,
};
use tracing::info;

/// Compare the actual records with the expected records.
pub fn run_verify(args: &VerifyArgs) -> anyhow::Result<VerificationReport> {
    let config = args
        .type_config()
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    info!(
        "Verifying {:?} against {:?} (memory budget {} bytes)",
        args.actual, args.expected, args.memory_budget
    );

    let mut expected = RecordSource::with_config(config.clone());
    expected
        .set_memory_budget(args.memory_budget)
        .load(&args.expected);
    let mut actual = RecordSource::with_config(config);
    actual.set_memory_budget(args.memory_budget).load(&args.actual);

    let report = actual
        .assert_equals(&mut expected)
        .with_context(|| format!("Records in {:?} differ from {:?}", args.actual, args.expected))?;

    info!("{}", report.summary());
    Ok(report)
}

/// Write generated records to a fixture file.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<u64> {
    let schema = Schema::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;
    let config = TypeConfig::for_schema(schema.clone());

    info!(
        "Generating {} '{}' records (seed={}, start index={})",
        args.count, schema.name, args.seed, args.start_index
    );

    let mut generator = DataGenerator::new(schema, args.seed).with_start_index(args.start_index);
    let mut output = SequentialOutputFormat::create(&args.output, &config)
        .with_context(|| format!("Failed to create {:?}", args.output))?;
    for record in generator.records(args.count) {
        let record = record.context("Failed to generate record")?;
        output.write(&record)?;
    }
    let written = output.finish()?;

    info!("Wrote {written} records to {:?}", args.output);
    Ok(written)
}

/// Sort a fixture file or directory by key into a single fixture file.
pub fn run_sort(args: &SortArgs) -> anyhow::Result<u64> {
    let schema = Schema::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    let mut source = RecordSource::with_config(TypeConfig::for_schema(schema));
    source.set_memory_budget(args.memory_budget).load(&args.input);
    let written = source
        .save_to_file(&args.output)
        .with_context(|| format!("Failed to sort {:?} into {:?}", args.input, args.output))?;
    source.close()?;

    info!("Sorted {written} records into {:?}", args.output);
    Ok(written)
}
