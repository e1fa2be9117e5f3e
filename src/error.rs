use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Side;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReconError>;

/// Every way a reconciliation can fail. The engine never returns a partial
/// report: each stage stops at the first of these it encounters.
#[derive(Debug, Error)]
pub enum ReconError {
    /// One or both uploads were not supplied.
    #[error("{side} input is missing{}", path_note(.path))]
    MissingInput { side: Side, path: Option<PathBuf> },

    /// The file extension is not one of `.xlsx`, `.xls` or `.csv`.
    #[error("unsupported file type for '{file}': expected .xlsx, .xls or .csv")]
    UnsupportedFileType { file: String },

    /// The bytes could not be decoded as a table.
    #[error("could not parse '{file}': {cause}")]
    Parse { file: String, cause: String },

    /// A parsed table has a header but no data rows.
    #[error("{side} input has no data rows")]
    EmptyInput { side: Side },

    #[error("key column '{column}' not found in {side} input")]
    MissingKeyColumn { side: Side, column: String },

    #[error("compare column '{column}' not found in {side} input")]
    MissingCompareColumn { side: Side, column: String },

    /// A data row has an empty key cell. `row` is 1-based and excludes the header.
    #[error("{side} input row {row} has no value in key column '{column}'")]
    BlankKey {
        side: Side,
        row: usize,
        column: String,
    },

    #[error("{side} input has duplicate key '{key}' in column '{column}'")]
    DuplicateKey {
        side: Side,
        column: String,
        key: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("could not write report: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Failures outside the engine proper, such as file I/O in the CLI.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ReconError {
    fn from(error: std::io::Error) -> Self {
        ReconError::Internal(format!("I/O error: {error}"))
    }
}

impl ReconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconError::MissingInput { .. } => ErrorKind::MissingInput,
            ReconError::UnsupportedFileType { .. } => ErrorKind::UnsupportedFileType,
            ReconError::Parse { .. } => ErrorKind::ParseError,
            ReconError::EmptyInput { .. } => ErrorKind::EmptyInput,
            ReconError::MissingKeyColumn { .. } => ErrorKind::MissingKeyColumn,
            ReconError::MissingCompareColumn { .. } => ErrorKind::MissingCompareColumn,
            ReconError::BlankKey { .. } => ErrorKind::BlankKey,
            ReconError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            ReconError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ReconError::Write(_) => ErrorKind::WriteError,
            ReconError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn parse(file: &str, cause: impl fmt::Display) -> Self {
        ReconError::Parse {
            file: file.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Closed set of error tags a presentation layer can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingInput,
    UnsupportedFileType,
    ParseError,
    EmptyInput,
    MissingKeyColumn,
    MissingCompareColumn,
    BlankKey,
    DuplicateKey,
    InvalidConfig,
    WriteError,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingInput => "missing_input",
            ErrorKind::UnsupportedFileType => "unsupported_file_type",
            ErrorKind::ParseError => "parse_error",
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::MissingKeyColumn => "missing_key_column",
            ErrorKind::MissingCompareColumn => "missing_compare_column",
            ErrorKind::BlankKey => "blank_key",
            ErrorKind::DuplicateKey => "duplicate_key",
            ErrorKind::InvalidConfig => "invalid_config",
            ErrorKind::WriteError => "write_error",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn path_note(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map(|path: &Path| format!(": {} not found", path.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_mentions_path_when_known() {
        let error = ReconError::MissingInput {
            side: Side::Right,
            path: Some(PathBuf::from("ledger.csv")),
        };
        assert_eq!(error.to_string(), "right input is missing: ledger.csv not found");
        assert_eq!(error.kind(), ErrorKind::MissingInput);

        let error = ReconError::MissingInput {
            side: Side::Both,
            path: None,
        };
        assert_eq!(error.to_string(), "left and right input is missing");
    }

    #[test]
    fn io_errors_are_internal() {
        let error = ReconError::from(std::io::Error::other("disk gone"));
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.kind().as_str(), "internal");
    }
}
