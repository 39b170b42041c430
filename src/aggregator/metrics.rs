//! Timing metrics for reconstructed calls.
//!
//! Every line item is measured against three reference points: its
//! enclosing scope, the root of its call, and the most recent important
//! event before it. A metric whose reference point does not exist is
//! left out rather than defaulted.

use crate::parser::schema::{LineItem, MetricKind};
use crate::utils::error::Anomaly;
use log::{debug, warn};

/// Compute all metrics for the items of one call, in place
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `call_key` - Key of the call, used in anomaly reports
/// * `items` - Line items from the stack builder, in processing order
///
/// # Returns
/// One `NegativeDuration` anomaly per metric that came out negative.
/// Negative values stay on the item so the report can flag them.
pub fn compute_metrics(call_key: &str, items: &mut [LineItem]) -> Vec<Anomaly> {
    let child_totals = immediate_child_totals(items);

    let root = items.first().map(|r| (r.start(), r.end_timestamp));
    let mut last_important: Option<f64> = None;
    let mut anomalies = Vec::new();

    for idx in 0..items.len() {
        let start = items[idx].start();
        let parent = items[idx]
            .parent
            .map(|p| (items[p].start(), items[p].end_timestamp));

        let mut computed: Vec<(MetricKind, f64)> = Vec::with_capacity(MetricKind::ALL.len());

        if let (Some(total), (children, true)) = (items[idx].duration(), child_totals[idx]) {
            computed.push((MetricKind::SelfTime, total - children));
        }

        if let Some((parent_start, parent_end)) = parent {
            computed.push((MetricKind::TimeFromScopeStart, start - parent_start));
            if let Some(end) = parent_end {
                computed.push((MetricKind::TimeToScopeEnd, end - start));
            }
        }

        if let Some((root_start, root_end)) = root {
            computed.push((MetricKind::TimeFromStackStart, start - root_start));
            if let Some(end) = root_end {
                computed.push((MetricKind::TimeToStackEnd, end - start));
            }
        }

        if let Some(important_start) = last_important {
            computed.push((MetricKind::TimeFromLastImportant, start - important_start));
        }

        let item = &mut items[idx];
        for (kind, value) in computed {
            if value < 0.0 {
                let anomaly = Anomaly::NegativeDuration {
                    call_key: call_key.to_string(),
                    line: item.event.record_line,
                    metric: kind,
                    value,
                };
                warn!("{}", anomaly);
                anomalies.push(anomaly);
            }
            item.metrics.insert(kind, value);
        }

        if item.event.important {
            last_important = Some(start);
        }
    }

    debug!("Call {}: computed metrics for {} items", call_key, items.len());
    anomalies
}

/// Sum of immediate children's durations per item, and whether every child was closed
///
/// **Private** - feeds the self-time computation
fn immediate_child_totals(items: &[LineItem]) -> Vec<(f64, bool)> {
    let mut totals = vec![(0.0, true); items.len()];

    for item in items {
        let Some(parent) = item.parent else {
            continue;
        };
        match item.duration() {
            Some(duration) => totals[parent].0 += duration,
            None => totals[parent].1 = false,
        }
    }

    totals
}

/// Per-call statistics shown in the report banner
///
/// **Public** - returned from summarize_call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallSummary {
    /// Raw events assigned to the call
    pub event_count: usize,

    /// Line items after reconstruction
    pub item_count: usize,

    /// Deepest nesting level reached
    pub max_depth: usize,

    /// Root duration, if the root was closed
    pub total_time: Option<f64>,

    pub anomaly_count: usize,
}

impl CallSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for banners and logging
    pub fn summary(&self) -> String {
        let total = match self.total_time {
            Some(t) => format!("{}", t),
            None => "open".to_string(),
        };
        format!(
            "Events: {} | Items: {} | Max depth: {} | Total: {} | Anomalies: {}",
            self.event_count, self.item_count, self.max_depth, total, self.anomaly_count
        )
    }
}

/// Summarize a reconstructed call
pub fn summarize_call(event_count: usize, items: &[LineItem], anomaly_count: usize) -> CallSummary {
    CallSummary {
        event_count,
        item_count: items.len(),
        max_depth: items.iter().map(|i| i.depth).max().unwrap_or(0),
        total_time: items.first().and_then(LineItem::duration),
        anomaly_count,
    }
}
