//! Command-line interface for recordcheck
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Write 10000 deterministic records
//! recordcheck generate \
//!   --schema events.yaml \
//!   --seed 7 --count 10000 \
//!   --output expected.jsonl
//! ```
//!
//! ## Verify
//! ```bash
//! # Exact comparison of a job's output directory with a fixture
//! recordcheck verify \
//!   --schema events.yaml \
//!   --expected expected.jsonl \
//!   --actual out/
//!
//! # Accept doubles within 0.001 and integers within 1
//! recordcheck verify \
//!   --schema events.yaml \
//!   --expected expected.jsonl \
//!   --actual out/ \
//!   --double-delta 0.001 --integer-delta 1
//! ```
//!
//! ## Sort
//! ```bash
//! recordcheck sort \
//!   --schema events.yaml \
//!   --input out/ \
//!   --output sorted.jsonl
//! ```
//!
//! Logging is controlled through `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use record_verify::{GenerateArgs, SortArgs, VerifyArgs};

#[derive(Parser)]
#[command(name = "recordcheck")]
#[command(about = "Verify that record streams are equal under bag semantics")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare actual records with expected records
    Verify(VerifyArgs),

    /// Write deterministic generated records to a fixture file
    Generate(GenerateArgs),

    /// Sort records by key into a single fixture file
    Sort(SortArgs),
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify(args) => {
            recordcheck::run_verify(&args)?;
        }
        Commands::Generate(args) => {
            recordcheck::run_generate(&args)?;
        }
        Commands::Sort(args) => {
            recordcheck::run_sort(&args)?;
        }
    }

    tracing::info!("Command completed successfully");
    Ok(())
}
