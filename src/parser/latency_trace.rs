//! Decoder for newline-delimited latency trace records.
//!
//! Each line of a trace file is one JSON object emitted by the runtime's
//! latency instrumentation:
//!
//! ```text
//! {"tag":"server_request_call","type":"{","t":0.0012,"imp":true,"file":"call.c","line":412,"callPtr":140234}
//! ```
//!
//! The schema is fixed: a missing or mistyped required field fails the
//! record (and therefore the run) instead of being papered over. Fields
//! the decoder does not know about are ignored.

use super::schema::{CallId, Event, EventKind};
use crate::utils::error::ParseError;
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Wire layout of one trace record
#[derive(Debug, Deserialize)]
struct RawRecord {
    tag: String,

    #[serde(rename = "type", alias = "kind")]
    kind: EventKind,

    t: f64,

    imp: bool,

    file: String,

    line: u32,

    #[serde(rename = "callPtr")]
    call_ptr: CallId,

    #[serde(default, rename = "cqTagPtr")]
    cq_tag_ptr: Option<CallId>,
}

/// Decode a single trace record
///
/// **Public** - pure, used by the file readers and by tests
///
/// # Arguments
/// * `text` - One line of the trace file
/// * `record_line` - 1-based line number, kept on the event for diagnostics
///
/// # Errors
/// * `ParseError::MalformedRecord` - Invalid JSON, missing field, wrong type
pub fn decode_record(text: &str, record_line: usize) -> Result<Event, ParseError> {
    let raw: RawRecord =
        serde_json::from_str(text).map_err(|e| ParseError::MalformedRecord {
            line: record_line,
            reason: e.to_string(),
        })?;

    if !raw.t.is_finite() {
        return Err(ParseError::MalformedRecord {
            line: record_line,
            reason: format!("timestamp is not finite: {}", raw.t),
        });
    }

    Ok(Event {
        tag: raw.tag,
        kind: raw.kind,
        timestamp: raw.t,
        important: raw.imp,
        source_file: raw.file,
        source_line: raw.line,
        call_id: raw.call_ptr,
        cq_tag: raw.cq_tag_ptr,
        record_line,
    })
}

/// Decode every record from a reader, in input order
///
/// Whitespace-only lines carry no record and are skipped. The first
/// malformed record aborts decoding.
pub fn parse_trace_reader(reader: impl Read) -> Result<Vec<Event>, ParseError> {
    let mut events = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let record_line = index + 1;

        if line.trim().is_empty() {
            debug!("Skipping blank line {}", record_line);
            continue;
        }

        events.push(decode_record(&line, record_line)?);
    }

    Ok(events)
}

/// Decode a trace held in memory
pub fn parse_trace_str(input: &str) -> Result<Vec<Event>, ParseError> {
    parse_trace_reader(input.as_bytes())
}

/// Decode a trace file
///
/// **Public** - main entry point for reading traces from disk
///
/// # Errors
/// * `ParseError::Io` - File cannot be opened or read
/// * `ParseError::MalformedRecord` - A record failed to decode
pub fn parse_trace_file(path: impl AsRef<Path>) -> Result<Vec<Event>, ParseError> {
    let path = path.as_ref();
    debug!("Reading trace from: {}", path.display());

    let file = File::open(path)?;
    let events = parse_trace_reader(file)?;

    info!("Decoded {} events from {}", events.len(), path.display());
    Ok(events)
}
