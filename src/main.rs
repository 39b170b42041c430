//! Call Analyzer CLI
//!
//! Reconstructs per-call scope trees from an RPC runtime latency trace
//! and prints a timing table for every call.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use latency_profile::commands::{execute_analyze, validate_args, AnalyzeArgs};
use latency_profile::output::TableFormat;
use latency_profile::utils::config::{AnalyzerConfig, DEFAULT_CALL_START_TAG, DEFAULT_SOURCE};

/// Process the latency trace of an instrumented RPC runtime
#[derive(Parser, Debug)]
#[command(name = "call-analyzer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Trace file (one JSON record per line)
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Table style for the report
    #[arg(long, value_enum, default_value_t = TableFormat::Simple)]
    fmt: TableFormat,

    /// Tag of the Open event that starts a call
    #[arg(long, env = "CALL_ANALYZER_CALL_TAG", default_value = DEFAULT_CALL_START_TAG)]
    call_tag: String,

    /// Print at most this many calls
    #[arg(long)]
    limit: Option<usize>,

    /// Also write the full report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = AnalyzeArgs {
        source: cli.source,
        format: cli.fmt,
        config: AnalyzerConfig::new().with_call_start_tag(cli.call_tag),
        limit: cli.limit,
        output_json: cli.json,
    };

    validate_args(&args)?;

    let report = execute_analyze(&args)?;
    print!("{}", report);

    Ok(())
}
