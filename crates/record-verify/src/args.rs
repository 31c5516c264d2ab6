//! CLI argument definitions for the record verifier.

use crate::config::TypeConfig;
use crate::error::VerifyError;
use crate::sort::DEFAULT_MEMORY_BUDGET;
use clap::Args;
use record_core::Schema;
use std::path::PathBuf;

/// Arguments for comparing an actual record set with an expected one.
#[derive(Args, Clone, Debug)]
pub struct VerifyArgs {
    /// Path to schema YAML file describing both record sets
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Expected records: a fixture file or a directory of fixture files
    #[arg(long, short = 'e')]
    pub expected: PathBuf,

    /// Actual records: a fixture file or a directory of fixture files
    #[arg(long, short = 'a')]
    pub actual: PathBuf,

    /// Accept doubles differing by at most this amount
    #[arg(long, env = "RECORDCHECK_DOUBLE_DELTA")]
    pub double_delta: Option<f64>,

    /// Accept integers differing by at most this amount
    #[arg(long)]
    pub integer_delta: Option<u64>,

    /// Memory budget in bytes for sorting each side
    #[arg(long, default_value_t = DEFAULT_MEMORY_BUDGET, env = "RECORDCHECK_MEMORY_BUDGET")]
    pub memory_budget: usize,
}

impl VerifyArgs {
    /// Load the schema and apply the tolerance overrides.
    pub fn type_config(&self) -> Result<TypeConfig, VerifyError> {
        let schema = Schema::from_file(&self.schema)?;
        let mut config = TypeConfig::for_schema(schema);
        if let Some(delta) = self.double_delta {
            if delta.is_nan() || delta < 0.0 {
                return Err(VerifyError::Configuration(format!(
                    "double delta must be non-negative, got {delta}"
                )));
            }
            config = config.with_double_delta(delta);
        }
        if let Some(delta) = self.integer_delta {
            config = config.with_integer_delta(delta);
        }
        Ok(config)
    }
}

/// Arguments for writing generated records to a fixture file.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to schema YAML file with generator definitions
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Random seed (the same seed always produces the same records)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of records to generate
    #[arg(long, default_value = "1000")]
    pub count: u64,

    /// Index of the first generated record
    #[arg(long, default_value = "0")]
    pub start_index: u64,

    /// Output fixture file
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

/// Arguments for sorting a fixture file by key.
#[derive(Args, Clone, Debug)]
pub struct SortArgs {
    /// Path to schema YAML file describing the records
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Input fixture file or directory
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output fixture file
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Memory budget in bytes before spilling sorted runs to disk
    #[arg(long, default_value_t = DEFAULT_MEMORY_BUDGET, env = "RECORDCHECK_MEMORY_BUDGET")]
    pub memory_budget: usize,
}
