//! Configuration and constants for the analyzer.

/// Trace file read when no `--source` is given
pub const DEFAULT_SOURCE: &str = "latency_trace.txt";

/// Tag of the `Open` event that starts server-side request handling
pub const DEFAULT_CALL_START_TAG: &str = "server_request_call";

/// Current JSON report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Spaces of indentation per scope depth in rendered tables
pub const INDENT_WIDTH: usize = 2;

/// Reconstruction settings shared by the partitioner and the commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Open events carrying this tag begin a new call
    pub call_start_tag: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            call_start_tag: DEFAULT_CALL_START_TAG.to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_start_tag(mut self, tag: impl Into<String>) -> Self {
        self.call_start_tag = tag.into();
        self
    }
}
