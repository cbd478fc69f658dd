//! Data types used by the aggregation pipeline.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// File and line a reading was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    pub line: u64,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// One sensor sample read from a daily log file.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Calendar date as written by the logger, `MM/DD/YYYY`.
    pub date: String,
    /// Time of day, `HH:MM:SS`.
    pub time: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Where the row came from; `None` for readings built in memory.
    pub source: Option<SourceLocation>,
}

impl Reading {
    pub fn new(date: &str, time: &str, temperature: f64, humidity: f64) -> Self {
        Self {
            date: date.to_string(),
            time: time.to_string(),
            temperature,
            humidity,
            source: None,
        }
    }

    pub fn with_source(mut self, path: &Path, line: u64) -> Self {
        self.source = Some(SourceLocation {
            path: path.to_path_buf(),
            line,
        });
        self
    }

    /// Date and time joined the way they are parsed into an instant.
    pub fn timestamp_text(&self) -> String {
        format!("{} {}", self.date, self.time)
    }
}

/// Readings that share a calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup {
    pub date: String,
    pub readings: Vec<Reading>,
}

/// Date groups in first-encounter order.
#[derive(Debug, Default)]
pub struct DateGroups {
    groups: Vec<DateGroup>,
    index: HashMap<String, usize>,
}

impl DateGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `reading` to the group for its date, creating the group on first sight.
    pub fn insert(&mut self, reading: Reading) {
        match self.index.get(&reading.date) {
            Some(&i) => self.groups[i].readings.push(reading),
            None => {
                self.index.insert(reading.date.clone(), self.groups.len());
                self.groups.push(DateGroup {
                    date: reading.date.clone(),
                    readings: vec![reading],
                });
            }
        }
    }

    pub fn get(&self, date: &str) -> Option<&DateGroup> {
        self.index.get(date).map(|&i| &self.groups[i])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateGroup> {
        self.groups.iter()
    }
}

impl IntoIterator for DateGroups {
    type Item = DateGroup;
    type IntoIter = std::vec::IntoIter<DateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Per-date averages, one row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub date: String,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
}
