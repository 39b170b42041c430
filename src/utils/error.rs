//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::schema::MetricKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while decoding a trace file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Line number of the offending record, if the error is tied to one
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedRecord { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}

/// Reconstruction anomalies found while processing a single call.
///
/// These never abort the run: each one is reported and the call's
/// remaining events are still processed.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    #[error("call {call_key}: close on line {line} has no matching open")]
    DanglingClose { call_key: String, line: usize },

    #[error("call {call_key}: {metric} is negative ({value}) for record on line {line}")]
    NegativeDuration {
        call_key: String,
        line: usize,
        metric: MetricKind,
        value: f64,
    },

    #[error("call {call_key}: scope '{tag}' opened on line {line} was never closed")]
    UnterminatedScope {
        call_key: String,
        tag: String,
        line: usize,
    },
}

impl Anomaly {
    /// Unterminated scopes are informational; everything else is a warning
    pub fn is_warning(&self) -> bool {
        !matches!(self, Anomaly::UnterminatedScope { .. })
    }
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_mentions_line() {
        let err = ParseError::MalformedRecord {
            line: 12,
            reason: "missing field `tag`".to_string(),
        };
        assert_eq!(err.line(), Some(12));
        assert!(err.to_string().contains("line 12"));
    }

    #[test]
    fn test_anomaly_severity() {
        let dangling = Anomaly::DanglingClose {
            call_key: "5".to_string(),
            line: 3,
        };
        let open = Anomaly::UnterminatedScope {
            call_key: "5".to_string(),
            tag: "read".to_string(),
            line: 2,
        };
        assert!(dangling.is_warning());
        assert!(!open.is_warning());
        assert_eq!(
            dangling.to_string(),
            "call 5: close on line 3 has no matching open"
        );
    }
}
