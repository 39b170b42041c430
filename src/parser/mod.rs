//! Trace decoding and data model definitions.
//!
//! This module handles:
//! - Decoding one JSON record per trace line into an `Event`
//! - Failing loudly (with the line number) on malformed records
//! - Defining the line item and report schema

pub mod latency_trace;
pub mod schema;

// Re-export main types
pub use latency_trace::{decode_record, parse_trace_file, parse_trace_reader, parse_trace_str};
pub use schema::{AnalysisReport, CallId, CallReport, Event, EventKind, LineItem, MetricKind};
