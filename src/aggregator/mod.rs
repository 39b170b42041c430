//! Reconstruction of calls, scope trees and timing metrics.
//!
//! This module transforms decoded events into:
//! - Calls (grouped by call pointer, split on pointer reuse)
//! - Per-call line items with depth and end times
//! - Per-item timing metrics

pub mod analysis;
pub mod metrics;
pub mod partition;
pub mod stack_builder;

// Re-export main types and functions
pub use analysis::{analyze_call, analyze_calls};
pub use metrics::{compute_metrics, summarize_call, CallSummary};
pub use partition::{partition_calls, split_reused_calls, Call};
pub use stack_builder::{build_line_items, ScopeTree};
