//! Error types for the aggregation pipeline.

use crate::aggregator::types::SourceLocation;
use std::path::PathBuf;

/// Coarse classification of an [`AggregateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing input files or a file whose shape does not match the schema.
    Input,
    /// A field that could not be converted into a number or timestamp.
    Parse,
    /// Reading or writing the filesystem failed.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("no csv files found in {}", .dir.display())]
    NoInputFiles { dir: PathBuf },

    #[error("{}:{line}: expected {expected} columns, found {found}", .path.display())]
    ColumnCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: {field} is not a number: {value:?}", .path.display())]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error(
        "{}invalid timestamp {value:?}, expected MM/DD/YYYY HH:MM:SS",
        .location.as_ref().map(|l| format!("{l}: ")).unwrap_or_default()
    )]
    InvalidTimestamp {
        location: Option<SourceLocation>,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{}: malformed csv", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: failed to render summary", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: i/o failure", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AggregateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AggregateError::NoInputFiles { .. }
            | AggregateError::ColumnCount { .. }
            | AggregateError::Csv { .. } => ErrorKind::Input,
            AggregateError::InvalidNumber { .. } | AggregateError::InvalidTimestamp { .. } => {
                ErrorKind::Parse
            }
            AggregateError::Render { .. } | AggregateError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AggregateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the aggregator.
pub type AggregateResult<T> = Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let err = AggregateError::NoInputFiles { dir: ".".into() };
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = AggregateError::InvalidNumber {
            path: "a.csv".into(),
            line: 2,
            field: "temperature",
            value: "N/A".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = AggregateError::io("Output.txt", std::io::ErrorKind::PermissionDenied.into());
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_render_failure_is_io() {
        let err = AggregateError::Render {
            path: "Output.txt".into(),
            source: csv::Error::from(std::io::Error::from(std::io::ErrorKind::WriteZero)),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_timestamp_message_with_and_without_location() {
        let source = chrono::NaiveDateTime::parse_from_str("x", "%m/%d/%Y %H:%M:%S").unwrap_err();

        let err = AggregateError::InvalidTimestamp {
            location: Some(SourceLocation {
                path: "day7.csv".into(),
                line: 2,
            }),
            value: "02/30/2023 08:00:00".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "day7.csv:2: invalid timestamp \"02/30/2023 08:00:00\", expected MM/DD/YYYY HH:MM:SS"
        );

        let err = AggregateError::InvalidTimestamp {
            location: None,
            value: "x".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid timestamp"));
    }

    #[test]
    fn test_message_names_file_and_line() {
        let err = AggregateError::ColumnCount {
            path: "day1.csv".into(),
            line: 7,
            expected: 5,
            found: 3,
        };
        assert_eq!(err.to_string(), "day1.csv:7: expected 5 columns, found 3");
    }
}
