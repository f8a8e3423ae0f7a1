//! Error types for the pr-records crate.
//!
//! Two kinds matter to callers:
//! - `MalformedInput`: a row exists but one of its required fields is missing or unparsable
//! - `SchemaMismatch`: a column the schema mapping names is absent from a source header
//!
//! Both are fatal for the project being processed. The remaining variants wrap
//! I/O, CSV, and configuration failures.

use thiserror::Error;

/// Errors that can occur while reading, normalizing, or writing selection data
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum SelectError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader or writer failed below the row level
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A row is missing a required field or the field cannot be parsed
    ///
    /// Carries enough context to let the caller repair the source data.
    #[error("Malformed input in {input} at line {line}, column '{column}': {reason}")]
    MalformedInput {
        input: String,
        line: u64,
        column: String,
        reason: String,
    },

    /// An expected column is absent from a source header
    #[error("Schema mismatch in {input}: missing column '{column}' (found: {found})")]
    SchemaMismatch {
        input: String,
        column: String,
        found: String,
    },

    /// Selection or schema configuration is invalid
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl SelectError {
    /// True for the two data-quality failures (as opposed to I/O or config problems)
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            SelectError::MalformedInput { .. } | SelectError::SchemaMismatch { .. }
        )
    }
}

/// Non-fatal conditions reported alongside a successful selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectWarning {
    /// The pattern source had zero usable entries, so no pull request can match
    #[error("Pattern source {input} contains no patterns; output will be empty")]
    EmptyPatternSet { input: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_names_row_and_column() {
        let err = SelectError::MalformedInput {
            input: "prs.csv".to_string(),
            line: 7,
            column: "files".to_string(),
            reason: "field is missing".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("prs.csv"));
        assert!(message.contains("line 7"));
        assert!(message.contains("'files'"));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_config_error_is_not_data_error() {
        let err = SelectError::ConfigError("empty column name".to_string());
        assert!(!err.is_data_error());
    }
}
