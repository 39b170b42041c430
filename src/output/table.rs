//! Tabular text rendering of analyzed calls.
//!
//! One table per call, one row per line item. The tag column is indented
//! by scope depth; metrics that do not apply are left blank and negative
//! (anomalous) values carry a trailing `!`.

use crate::aggregator::summarize_call;
use crate::parser::schema::{AnalysisReport, CallReport, LineItem, MetricKind};
use crate::utils::config::INDENT_WIDTH;
use clap::ValueEnum;
use std::fmt::Write;

/// Supported table styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TableFormat {
    /// Columns separated by whitespace, no rules
    Plain,
    /// Header underlined with dashes
    #[default]
    Simple,
    /// Box drawn with `+`, `-` and `|`
    Grid,
    /// Markdown pipe table
    Pipe,
    /// HTML document with one table per call
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Render a full report
///
/// **Public** - main entry point for text output
///
/// # Arguments
/// * `report` - Analyzed calls
/// * `format` - Table style
/// * `limit` - Render at most this many calls
pub fn render_report(report: &AnalysisReport, format: TableFormat, limit: Option<usize>) -> String {
    let mut out = String::new();
    let limit = limit.unwrap_or(usize::MAX);

    if format == TableFormat::Html {
        out.push_str("<html>\n<head>\n<title>Latency Profile Report</title>\n</head>\n<body>\n");
    }

    for call in report.calls.iter().take(limit) {
        out.push_str(&render_call(call, format));
        out.push('\n');
    }

    if format == TableFormat::Html {
        out.push_str("</body>\n</html>\n");
    }

    out
}

/// Render one call: banner line followed by its table
pub fn render_call(call: &CallReport, format: TableFormat) -> String {
    let summary = summarize_call(call.event_count, &call.items, call.anomalies.len());
    let mut out = String::new();

    match format {
        TableFormat::Html => {
            let _ = writeln!(
                out,
                "<h3>Call {}: {} events</h3>\n<p>{}</p>",
                html_escape(&call.key),
                call.event_count,
                html_escape(&summary.summary())
            );
        }
        TableFormat::Pipe => {
            let _ = writeln!(out, "### Call {}: {} events\n", call.key, call.event_count);
        }
        _ => {
            let _ = writeln!(out, "Call {}: {} events", call.key, call.event_count);
            let _ = writeln!(out, "{}", summary.summary());
        }
    }

    let (header, aligns) = columns();
    let rows: Vec<Vec<String>> = call.items.iter().map(row).collect();

    out.push_str(&match format {
        TableFormat::Plain => render_plain(&header, &rows, &aligns),
        TableFormat::Simple => render_simple(&header, &rows, &aligns),
        TableFormat::Grid => render_grid(&header, &rows, &aligns),
        TableFormat::Pipe => render_pipe(&header, &rows, &aligns),
        TableFormat::Html => render_html(&header, &rows),
    });

    out
}

/// Column headers and alignment
///
/// **Private** - shared by every style
fn columns() -> (Vec<String>, Vec<Align>) {
    let mut header: Vec<String> = ["tag", "loc", "imp", "start", "end"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let mut aligns = vec![Align::Left, Align::Left, Align::Left, Align::Right, Align::Right];

    for kind in MetricKind::ALL {
        header.push(kind.column_header().to_string());
        aligns.push(Align::Right);
    }

    (header, aligns)
}

fn row(item: &LineItem) -> Vec<String> {
    let mut cells = vec![
        format!("{}{}", " ".repeat(item.depth * INDENT_WIDTH), item.event.tag),
        format!("{}:{}", item.event.source_file, item.event.source_line),
        if item.event.important { "*" } else { "" }.to_string(),
        format_time(item.start()),
        item.end_timestamp.map(format_time).unwrap_or_default(),
    ];

    for kind in MetricKind::ALL {
        cells.push(item.metric(kind).map(format_metric).unwrap_or_default());
    }

    cells
}

fn format_time(value: f64) -> String {
    format!("{}", value)
}

/// Negative durations only come from broken reconstruction; mark them
fn format_metric(value: f64) -> String {
    if value < 0.0 {
        format!("{}!", value)
    } else {
        format_time(value)
    }
}

fn widths(header: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", cell, width = width),
        Align::Right => format!("{:>width$}", cell, width = width),
    }
}

fn join_line(cells: &[String], widths: &[usize], aligns: &[Align], sep: &str) -> String {
    cells
        .iter()
        .zip(widths)
        .zip(aligns)
        .map(|((cell, w), a)| pad(cell, *w, *a))
        .collect::<Vec<_>>()
        .join(sep)
}

fn render_plain(header: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let widths = widths(header, rows);
    let mut out = String::new();
    for line in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        let _ = writeln!(out, "{}", join_line(line, &widths, aligns, "  ").trim_end());
    }
    out
}

fn render_simple(header: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let widths = widths(header, rows);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = String::new();
    let _ = writeln!(out, "{}", join_line(header, &widths, aligns, "  ").trim_end());
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in rows {
        let _ = writeln!(out, "{}", join_line(row, &widths, aligns, "  ").trim_end());
    }
    out
}

fn render_grid(header: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let widths = widths(header, rows);
    let border = |fill: &str| {
        let parts: Vec<String> = widths.iter().map(|w| fill.repeat(w + 2)).collect();
        format!("+{}+", parts.join("+"))
    };
    let line = |cells: &[String]| format!("| {} |", join_line(cells, &widths, aligns, " | "));

    let mut out = String::new();
    let _ = writeln!(out, "{}", border("-"));
    let _ = writeln!(out, "{}", line(header));
    let _ = writeln!(out, "{}", border("="));
    for row in rows {
        let _ = writeln!(out, "{}", line(row));
        let _ = writeln!(out, "{}", border("-"));
    }
    out
}

fn render_pipe(header: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let widths: Vec<usize> = widths(header, rows).into_iter().map(|w| w.max(3)).collect();
    let rule: Vec<String> = widths
        .iter()
        .zip(aligns)
        .map(|(w, a)| match a {
            Align::Left => format!(":{}", "-".repeat(w - 1)),
            Align::Right => format!("{}:", "-".repeat(w - 1)),
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "| {} |", join_line(header, &widths, aligns, " | "));
    let _ = writeln!(out, "| {} |", rule.join(" | "));
    for row in rows {
        let _ = writeln!(out, "| {} |", join_line(row, &widths, aligns, " | "));
    }
    out
}

fn render_html(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table>\n<thead>\n<tr>");
    for h in header {
        let _ = write!(out, "<th>{}</th>", html_escape(h));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            // keep depth indentation visible
            let cell = html_escape(cell).replace(' ', "&nbsp;");
            let _ = write!(out, "<td>{}</td>", cell);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
