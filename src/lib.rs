//! Latency Profile
//!
//! Call-stack and timing reconstruction for the latency traces emitted by
//! an instrumented RPC runtime.
//!
//! A trace is one JSON record per line. Records are grouped into calls by
//! call pointer (split where the runtime reused a pointer), each call's
//! open/close events are rebuilt into a scope tree, and every item gets
//! timing metrics relative to its scope, its call and the last important
//! event.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install latency-profile
//! call-analyzer --source latency_trace.txt --fmt simple
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
