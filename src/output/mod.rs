//! Output writers for analyzed calls.
//!
//! This module handles:
//! - Tabular text reports (plain, simple, grid, pipe, html)
//! - JSON reports written to disk

pub mod json;
pub mod table;

// Re-export main functions
pub use json::{read_report, write_report};
pub use table::{render_call, render_report, TableFormat};
