//! Error types for bethyw-core

use crate::columns::SourceColumn;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bethyw-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open or read a dataset file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No name stored for a language tag
    #[error("no name found for language '{0}'")]
    LanguageNotFound(String),

    /// No measure stored for a code (message keeps the caller's casing)
    #[error("No measure found matching {0}")]
    MeasureNotFound(String),

    /// No value stored for a year
    #[error("No value found for year {0}")]
    YearNotFound(u32),

    /// No region stored for an authority code
    #[error("no area found for local authority code '{0}'")]
    AreaNotFound(String),

    /// No dataset in the catalogue has this code
    #[error("No dataset matches key: {0}")]
    DatasetNotFound(String),

    /// The column mapping lacks an entry a parser needs
    #[error("column mapping has no entry for {0}")]
    ColumnNotMapped(SourceColumn),

    /// A row or record could not be interpreted
    #[error("malformed input at record {record}: {message}")]
    MalformedInput { record: usize, message: String },

    /// The stream was unreadable or empty before parsing began
    #[error("invalid input stream: {0}")]
    InvalidStream(String),

    /// Unknown source data type tag
    #[error("unsupported source data type '{0}'")]
    UnsupportedFormat(String),

    /// Invalid command line filter value
    #[error("{0}")]
    InvalidArgument(String),

    /// CSV parsing error from the csv crate
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(record: usize, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            record,
            message: message.into(),
        }
    }

    /// True for lookups that failed because a key was absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::LanguageNotFound(_)
                | Error::MeasureNotFound(_)
                | Error::YearNotFound(_)
                | Error::AreaNotFound(_)
                | Error::DatasetNotFound(_)
                | Error::ColumnNotMapped(_)
        )
    }
}
