//! Brier Settle — Entry Point
//!
//! CLI shell over the settlement engine. Wiring sequence:
//! 1. Parse CLI arguments
//! 2. Load optional config.toml + validate
//! 3. Init tracing (structured logging to stderr)
//! 4. Dispatch subcommand (generate | verify)
//!
//! `generate` loads a scenario document, settles every scenario, and writes
//! the enriched document back out. `verify` independently recomputes a
//! settled document and exits nonzero if any scenario fails its checks.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use brier_settle::adapters::JsonFileStore;
use brier_settle::config;
use brier_settle::ports::store::ScenarioStore;
use brier_settle::usecases::{generate, verify};

#[derive(Parser)]
#[command(name = "brier-settle", version, about = "Prediction wager settlement engine")]
struct Cli {
    /// Path to a TOML config file (defaults used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Settle every scenario in a document and write the results
    Generate {
        /// Input scenario document (JSON array or single object)
        input: PathBuf,

        /// Destination for the settled document; may equal the input
        output: PathBuf,

        /// Indent width for the written JSON
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },

    /// Recompute a settled document and report discrepancies
    Verify {
        /// Settled scenario document to check
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "Run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = config::loader::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting settlement engine"
    );

    let store = JsonFileStore::new();

    match cli.command {
        Command::Generate {
            input,
            output,
            indent,
        } => {
            let mut scenarios = store
                .load(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;

            let report = generate::process_document(&mut scenarios, &config)
                .context("Settlement generation failed")?;

            store
                .save(&output, &scenarios, indent)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "Settled {} scenario(s), {} outcome(s), {} adjustment(s) -> {}",
                report.scenarios,
                report.outcomes,
                report.adjustments,
                output.display()
            );
            Ok(ExitCode::SUCCESS)
        }

        Command::Verify { file } => {
            let scenarios = store
                .load(&file)
                .with_context(|| format!("Failed to load {}", file.display()))?;

            let report = verify::verify_document(&scenarios, &config);

            for failure in &report.failures {
                eprintln!("FAIL: {failure}");
            }
            println!(
                "{} passed, {} failed",
                report.passed,
                report.failures.len()
            );

            if report.all_passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
