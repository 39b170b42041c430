//! Data model shared by the decoder, the aggregator and the report writers.
//!
//! `Event` is what one trace record decodes to. `LineItem` is an event after
//! scope reconstruction, decorated with depth, end time and metrics.
//! The JSON report schema is versioned to allow future evolution.

use crate::utils::error::Anomaly;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier correlating the events of one call.
///
/// The runtime emits the address of its call object, so the same value
/// can show up again for an unrelated call once the first one is freed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallId {
    Num(u64),
    Text(String),
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallId::Num(n) => write!(f, "{}", n),
            CallId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for CallId {
    fn from(value: u64) -> Self {
        CallId::Num(value)
    }
}

impl From<&str> for CallId {
    fn from(value: &str) -> Self {
        CallId::Text(value.to_string())
    }
}

/// Kind of instrumentation event.
///
/// Trace files spell these `{`, `}` and `!`; the word forms are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[serde(alias = "{")]
    Open,
    #[serde(alias = "}")]
    Close,
    #[serde(alias = "!")]
    Mark,
}

/// One decoded instrumentation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Instrumentation point name
    pub tag: String,

    pub kind: EventKind,

    /// Monotonic time, same unit across the whole file
    pub timestamp: f64,

    /// Reference point for `TimeFromLastImportant`
    pub important: bool,

    pub source_file: String,
    pub source_line: u32,

    pub call_id: CallId,

    /// Completion-queue tag (diagnostic only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cq_tag: Option<CallId>,

    /// 1-based line of the record in the trace file
    pub record_line: usize,
}

impl Event {
    /// True if this event opens a new call under the given start tag
    pub fn starts_call(&self, call_start_tag: &str) -> bool {
        self.kind == EventKind::Open && self.tag == call_start_tag
    }
}

/// Derived duration metrics computed for each line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    SelfTime,
    TimeFromScopeStart,
    TimeToScopeEnd,
    TimeFromStackStart,
    TimeToStackEnd,
    TimeFromLastImportant,
}

impl MetricKind {
    /// Every metric, in report column order
    pub const ALL: [MetricKind; 6] = [
        MetricKind::SelfTime,
        MetricKind::TimeFromScopeStart,
        MetricKind::TimeToScopeEnd,
        MetricKind::TimeFromStackStart,
        MetricKind::TimeToStackEnd,
        MetricKind::TimeFromLastImportant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::SelfTime => "self_time",
            MetricKind::TimeFromScopeStart => "time_from_scope_start",
            MetricKind::TimeToScopeEnd => "time_to_scope_end",
            MetricKind::TimeFromStackStart => "time_from_stack_start",
            MetricKind::TimeToStackEnd => "time_to_stack_end",
            MetricKind::TimeFromLastImportant => "time_from_last_important",
        }
    }

    /// Short column header used by the table renderer
    pub fn column_header(&self) -> &'static str {
        match self {
            MetricKind::SelfTime => "self",
            MetricKind::TimeFromScopeStart => "from_scope_start",
            MetricKind::TimeToScopeEnd => "to_scope_end",
            MetricKind::TimeFromStackStart => "from_stack_start",
            MetricKind::TimeToStackEnd => "to_stack_end",
            MetricKind::TimeFromLastImportant => "from_last_imp",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event after scope reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub event: Event,

    /// Nesting depth within the call (0 = top of call)
    pub depth: usize,

    /// Set when the item's Open was matched by a Close; marks end where they start
    pub end_timestamp: Option<f64>,

    /// Metrics whose reference point exists for this item
    #[serde(default)]
    pub metrics: BTreeMap<MetricKind, f64>,

    /// Index of the enclosing scope's item within the same call
    #[serde(skip)]
    pub parent: Option<usize>,
}

impl LineItem {
    pub fn new(event: Event, depth: usize, parent: Option<usize>) -> Self {
        Self {
            event,
            depth,
            end_timestamp: None,
            metrics: BTreeMap::new(),
            parent,
        }
    }

    pub fn start(&self) -> f64 {
        self.event.timestamp
    }

    /// Total time spent inside this item, if it was closed
    pub fn duration(&self) -> Option<f64> {
        self.end_timestamp.map(|end| end - self.event.timestamp)
    }

    pub fn metric(&self, kind: MetricKind) -> Option<f64> {
        self.metrics.get(&kind).copied()
    }
}

/// Reconstruction result for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReport {
    /// `<callPtr>` or `<callPtr>_<n>` when the identifier was reused
    pub key: String,

    /// Number of raw events assigned to the call (closes included)
    pub event_count: usize,

    pub items: Vec<LineItem>,

    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file that was analyzed
    pub source: String,

    /// Records decoded from the trace file
    pub total_events: usize,

    pub calls: Vec<CallReport>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

impl AnalysisReport {
    pub fn anomaly_count(&self) -> usize {
        self.calls.iter().map(|c| c.anomalies.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_id_ordering_and_display() {
        let mut ids = vec![CallId::from("abc"), CallId::from(10), CallId::from(7)];
        ids.sort();
        assert_eq!(ids, vec![CallId::Num(7), CallId::Num(10), CallId::from("abc")]);
        assert_eq!(CallId::Num(140_234).to_string(), "140234");
        assert_eq!(CallId::from("0x7f00").to_string(), "0x7f00");
    }

    #[test]
    fn test_metric_kind_serializes_as_map_key() {
        let mut metrics = BTreeMap::new();
        metrics.insert(MetricKind::SelfTime, 2.0);
        let json = serde_json::to_string(&metrics).unwrap();
        assert_eq!(json, r#"{"self_time":2.0}"#);
    }

    #[test]
    fn test_kind_aliases() {
        let open: EventKind = serde_json::from_str(r#""{""#).unwrap();
        let close: EventKind = serde_json::from_str(r#""close""#).unwrap();
        let mark: EventKind = serde_json::from_str(r#""!""#).unwrap();
        assert_eq!(open, EventKind::Open);
        assert_eq!(close, EventKind::Close);
        assert_eq!(mark, EventKind::Mark);
    }
}
