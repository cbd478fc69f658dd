//! Dry/wet calibration logging.
//!
//! The sensor sketch prints one raw value per line. A calibration run
//! captures a block of lines with the probe dry and another block with it
//! wet, then writes both blocks to a text file for a spreadsheet.

use super::LineReader;
use anyhow::{Context, Result, bail};
use std::fs;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// Lines captured per setup.
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Reads `count` lines from the device.
#[tracing::instrument(skip(lines))]
pub fn log_block<R: BufRead>(lines: &mut LineReader<R>, count: usize) -> Result<Vec<String>> {
    let mut values = Vec::with_capacity(count);

    while values.len() < count {
        let Some(line) = lines.next_line().context("failed to read from device")? else {
            bail!(
                "device closed the connection after {} of {} lines",
                values.len(),
                count
            );
        };
        info!(value = %line, "Sample");
        values.push(line);
    }

    Ok(values)
}

/// Lays out both blocks, each line newline-terminated and each block
/// followed by an empty line.
pub fn render_calibration(dry: &[String], wet: &[String]) -> String {
    let mut out = String::new();
    for block in [dry, wet] {
        for value in block {
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Writes the calibration file, replacing any previous run.
pub fn write_calibration(path: &Path, dry: &[String], wet: &[String]) -> Result<()> {
    fs::write(path, render_calibration(dry, wet))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), dry = dry.len(), wet = wet.len(), "Calibration values written");
    Ok(())
}
