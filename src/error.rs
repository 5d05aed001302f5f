//! Error types for csvfold

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error raised by a caller's reducer
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced by a read-and-fold operation
#[derive(Debug, Error)]
pub enum CsvFoldError {
    /// Supplied-header mode was requested with no headers
    #[error("headers must be provided when the first line is not a header line")]
    MissingHeaders,

    /// Delimiter is empty or overlaps the quote character
    #[error("invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Source file is missing or unreadable
    #[error("source unavailable '{}': {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure while pulling a line from an opened source
    #[error("failed to read '{}' line {line_index}: {source}", path.display())]
    Read {
        path: PathBuf,
        line_index: u64,
        #[source]
        source: std::io::Error,
    },

    /// Compressed source could not be opened or has no usable entry
    #[error("archive error for '{}': {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// The reducer failed on a record; the whole read is aborted
    #[error("error processing '{}' line {line_index}: {source}", path.display())]
    RecordProcessingFailed {
        path: PathBuf,
        line_index: u64,
        #[source]
        source: BoxError,
    },
}

impl CsvFoldError {
    /// 1-based line index the error is attributed to, if any
    pub fn line_index(&self) -> Option<u64> {
        match self {
            CsvFoldError::Read { line_index, .. }
            | CsvFoldError::RecordProcessingFailed { line_index, .. } => Some(*line_index),
            _ => None,
        }
    }
}

/// Result type alias for csvfold operations
pub type Result<T> = std::result::Result<T, CsvFoldError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_processing_error_keeps_cause() {
        let err = CsvFoldError::RecordProcessingFailed {
            path: PathBuf::from("data.csv"),
            line_index: 3,
            source: "bad scale".into(),
        };

        assert_eq!(err.line_index(), Some(3));
        assert_eq!(err.to_string(), "error processing 'data.csv' line 3: bad scale");
        assert_eq!(err.source().map(|e| e.to_string()), Some("bad scale".to_string()));
    }

    #[test]
    fn test_config_errors_have_no_line() {
        assert_eq!(CsvFoldError::MissingHeaders.line_index(), None);
        assert_eq!(
            CsvFoldError::InvalidDelimiter(String::new()).line_index(),
            None
        );
    }
}
