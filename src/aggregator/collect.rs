//! Input discovery and parsing of daily sensor log files.

use crate::aggregator::types::Reading;
use crate::config::AggregatorConfig;
use crate::error::{AggregateError, AggregateResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns every log file carries: date, time, (unused), temperature, humidity.
pub const COLUMN_COUNT: usize = 5;

const DATE_COLUMN: usize = 0;
const TIME_COLUMN: usize = 1;
const TEMPERATURE_COLUMN: usize = 3;
const HUMIDITY_COLUMN: usize = 4;

/// Reads every log file under the configured directory into one sequence.
///
/// Files are visited in path order, rows in file order.
///
/// # Errors
///
/// Fails when no file is found or when any row of any file cannot be parsed.
#[tracing::instrument(skip(config), fields(input_dir = %config.input_dir.display(), recursive = config.recursive))]
pub fn collect_records(config: &AggregatorConfig) -> AggregateResult<Vec<Reading>> {
    let files = find_input_files(&config.input_dir, config.recursive)?;
    if files.is_empty() {
        return Err(AggregateError::NoInputFiles {
            dir: config.input_dir.clone(),
        });
    }

    info!(file_count = files.len(), "Loading and combining data");

    let mut records = Vec::new();
    for path in &files {
        let rows = load_readings(path)?;
        debug!(path = %path.display(), rows = rows.len(), "File loaded");
        records.extend(rows);
    }

    info!(records = records.len(), "Data loaded");
    Ok(records)
}

/// Lists `*.csv` files in `dir`, sorted by path.
pub fn find_input_files(dir: &Path, recursive: bool) -> AggregateResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    visit_dir(dir, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn visit_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> AggregateResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| AggregateError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| AggregateError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| AggregateError::io(&path, e))?;

        if file_type.is_dir() {
            if recursive {
                visit_dir(&path, recursive, files)?;
            }
            continue;
        }

        if is_csv(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Parses a single log file. The first row is a header and is not inspected
/// beyond its column count.
pub fn load_readings(path: &Path) -> AggregateResult<Vec<Reading>> {
    let file = File::open(path).map_err(|e| AggregateError::io(path, e))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let header_len = rdr
        .headers()
        .map_err(|e| csv_error(path, e))?
        .len();
    if header_len != COLUMN_COUNT {
        return Err(AggregateError::ColumnCount {
            path: path.to_path_buf(),
            line: 1,
            expected: COLUMN_COUNT,
            found: header_len,
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        rows.push(parse_reading(path, &record)?);
    }

    Ok(rows)
}

fn parse_reading(path: &Path, record: &StringRecord) -> AggregateResult<Reading> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    if record.len() != COLUMN_COUNT {
        return Err(AggregateError::ColumnCount {
            path: path.to_path_buf(),
            line,
            expected: COLUMN_COUNT,
            found: record.len(),
        });
    }

    let number = |column: usize, field: &'static str| -> AggregateResult<f64> {
        let raw = &record[column];
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(AggregateError::InvalidNumber {
                path: path.to_path_buf(),
                line,
                field,
                value: raw.to_string(),
            }),
        }
    };

    let reading = Reading::new(
        &record[DATE_COLUMN],
        &record[TIME_COLUMN],
        number(TEMPERATURE_COLUMN, "temperature")?,
        number(HUMIDITY_COLUMN, "humidity")?,
    );
    Ok(reading.with_source(path, line))
}

fn csv_error(path: &Path, source: csv::Error) -> AggregateError {
    AggregateError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
