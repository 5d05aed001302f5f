//! Read configuration

use crate::error::{CsvFoldError, Result};

/// Default field delimiter
pub const DEFAULT_DELIMITER: &str = ",";

/// Default quote character
pub const DEFAULT_QUOTE: char = '"';

/// Where the column names of a read come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum HeaderMode {
    /// Consume the first line of the file as the header line
    #[default]
    FromFirstLine,
    /// Use these names; every line of the file is data
    Supplied(Vec<String>),
}

/// Immutable description of one read operation (minus the file path)
///
/// # Examples
///
/// ```
/// use csvfold::{FoldConfig, HeaderMode};
///
/// let config = FoldConfig {
///     delimiter: ";".to_string(),
///     header_mode: HeaderMode::Supplied(vec!["id".into(), "scale".into()]),
///     ..FoldConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FoldConfig {
    /// Field separator, may be longer than one character
    pub delimiter: String,
    /// Character wrapping fields that contain the delimiter
    pub quote: char,
    /// Header source
    pub header_mode: HeaderMode,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            quote: DEFAULT_QUOTE,
            header_mode: HeaderMode::FromFirstLine,
        }
    }
}

impl FoldConfig {
    /// Check the configuration before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(CsvFoldError::InvalidDelimiter(
                "delimiter must not be empty".to_string(),
            ));
        }
        if self.delimiter.contains(self.quote) {
            return Err(CsvFoldError::InvalidDelimiter(format!(
                "delimiter '{}' contains the quote character '{}'",
                self.delimiter, self.quote
            )));
        }
        if let HeaderMode::Supplied(headers) = &self.header_mode {
            if headers.is_empty() {
                return Err(CsvFoldError::MissingHeaders);
            }
        }
        Ok(())
    }
}
