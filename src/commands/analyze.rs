//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Decodes the trace file
//! 2. Partitions events into calls
//! 3. Rebuilds scope trees and computes metrics per call
//! 4. Renders the report (and optionally writes JSON)

use crate::aggregator::{analyze_calls, partition_calls};
use crate::output::{render_report, write_report, TableFormat};
use crate::parser::parse_trace_file;
use crate::parser::schema::AnalysisReport;
use crate::utils::config::{AnalyzerConfig, DEFAULT_SOURCE, REPORT_SCHEMA_VERSION};
use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace file to read
    pub source: PathBuf,

    /// Table style for the text report
    pub format: TableFormat,

    /// Reconstruction settings
    pub config: AnalyzerConfig,

    /// Render at most this many calls
    pub limit: Option<usize>,

    /// Optional path for the JSON report
    pub output_json: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            format: TableFormat::default(),
            config: AnalyzerConfig::default(),
            limit: None,
            output_json: None,
        }
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.source.as_os_str().is_empty() {
        anyhow::bail!("Source path cannot be empty");
    }

    if args.config.call_start_tag.trim().is_empty() {
        anyhow::bail!("Call start tag cannot be empty");
    }

    if args.limit == Some(0) {
        anyhow::bail!("limit must be greater than 0");
    }

    Ok(())
}

/// Build the full report for a trace file
///
/// **Public** - decoding, partitioning and reconstruction without rendering
///
/// # Errors
/// * Unreadable trace file
/// * Malformed record (the error names its line number)
pub fn build_report(args: &AnalyzeArgs) -> Result<AnalysisReport> {
    info!("Step 1/3: Decoding {}...", args.source.display());
    let events = parse_trace_file(&args.source)
        .with_context(|| format!("Failed to decode trace {}", args.source.display()))?;
    let total_events = events.len();

    info!("Step 2/3: Partitioning {} events into calls...", total_events);
    let calls = partition_calls(events, &args.config.call_start_tag);

    info!("Step 3/3: Reconstructing {} calls...", calls.len());
    let reports = analyze_calls(&calls);

    let report = AnalysisReport {
        version: REPORT_SCHEMA_VERSION.to_string(),
        source: args.source.display().to_string(),
        total_events,
        calls: reports,
        generated_at: Utc::now().to_rfc3339(),
    };

    debug!(
        "Report: {} calls, {} anomalies",
        report.calls.len(),
        report.anomaly_count()
    );

    Ok(report)
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// Returns the rendered text report; main.rs prints it.
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<String> {
    let start_time = Instant::now();

    let report = build_report(args)?;

    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", path.display());
    }

    let rendered = render_report(&report, args.format, args.limit);

    let warnings = report
        .calls
        .iter()
        .flat_map(|c| &c.anomalies)
        .filter(|a| a.is_warning())
        .count();
    if warnings > 0 {
        warn!(
            "{} reconstruction warnings across {} calls",
            warnings,
            report.calls.len()
        );
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(rendered)
}
