//! Per-call reconstruction pipeline.
//!
//! Calls share nothing once partitioned, so each one is rebuilt and
//! measured on its own rayon worker. Results keep partition order.

use super::metrics::compute_metrics;
use super::partition::Call;
use super::stack_builder::build_line_items;
use crate::parser::schema::CallReport;
use log::debug;
use rayon::prelude::*;

/// Rebuild the scope tree of one call and compute its metrics
pub fn analyze_call(call: &Call) -> CallReport {
    let mut tree = build_line_items(call);
    let metric_anomalies = compute_metrics(&call.key, &mut tree.items);
    tree.anomalies.extend(metric_anomalies);

    CallReport {
        key: call.key.clone(),
        event_count: call.events.len(),
        items: tree.items,
        anomalies: tree.anomalies,
    }
}

/// Analyze every call in parallel
///
/// **Public** - main entry point after partitioning
pub fn analyze_calls(calls: &[Call]) -> Vec<CallReport> {
    debug!("Analyzing {} calls", calls.len());
    calls.par_iter().map(analyze_call).collect()
}
