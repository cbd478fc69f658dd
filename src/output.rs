//! Output formatting and persistence for per-date summaries.
//!
//! Supports pretty-printing, JSON serialization, and the tab-separated
//! summary file.

use anyhow::Result;
use tracing::debug;

use crate::aggregator::SummaryRow;
use crate::error::{AggregateError, AggregateResult};
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::path::Path;

/// Header line of the summary file.
pub const SUMMARY_HEADER: [&str; 3] = ["date", "ave temperature", "ave humidity"];

/// Logs summary rows using Rust's debug pretty-print format.
pub fn print_pretty(rows: &[SummaryRow]) {
    debug!("{:#?}", rows);
}

/// Prints summary rows to stdout as pretty JSON.
pub fn print_json(rows: &[SummaryRow]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

/// Formats an average in its shortest round-trip form, always with a
/// fractional part (`21.0`, `21.46`).
pub fn format_average(value: f64) -> String {
    format!("{:?}", value)
}

/// Renders the tab-separated summary table into memory.
pub fn render_summary(rows: &[SummaryRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(SUMMARY_HEADER)?;
    for row in rows {
        let temperature = format_average(row.avg_temperature);
        let humidity = format_average(row.avg_humidity);
        writer.write_record([row.date.as_str(), temperature.as_str(), humidity.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Writes the summary table to `path`, replacing any existing file.
pub fn write_summary(path: &Path, rows: &[SummaryRow]) -> AggregateResult<()> {
    let bytes = render_summary(rows).map_err(|source| AggregateError::Render {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Writing summary");

    fs::write(path, bytes).map_err(|e| AggregateError::io(path, e))
}
