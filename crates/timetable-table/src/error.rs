//! Error types for the timetable-table crate.

use thiserror::Error;
use timetable_core::TimetableError;

/// Startup-fatal: the table could not be built. The service must not serve
/// traffic after one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV: ragged rows, invalid UTF-8, read failures.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("required column missing: {column}")]
    MissingColumn { column: String },

    #[error("invalid time {value:?} in column {column} at line {line} (expected HH:MM:SS)")]
    InvalidTime {
        line: u64,
        column: String,
        value: String,
    },

    /// The configured delimiter is not a single ASCII byte.
    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Per-request and recoverable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("{name} must be {expected}, got {value}")]
    InvalidParameter {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl From<LoadError> for TimetableError {
    fn from(e: LoadError) -> Self {
        TimetableError::Load(e.to_string())
    }
}

impl From<QueryError> for TimetableError {
    fn from(e: QueryError) -> Self {
        TimetableError::InvalidParameter(e.to_string())
    }
}
