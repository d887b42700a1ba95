//! Error types for the bikeshare library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bikeshare operations.
#[derive(Debug, Error)]
pub enum BikeshareError {
    /// The backing dataset file does not exist.
    #[error("Dataset not found: '{}'", path.display())]
    MissingSource { path: PathBuf },

    /// Error reading or accessing a file.
    #[error("IO error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a single field of delimited text.
    #[error("Parse error at row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record that violates a data invariant.
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// A filter value that has no entry in the label tables.
    #[error("Invalid value '{value}' for filter '{field}'")]
    InvalidFilterValue { field: String, value: String },

    /// Malformed aggregation request.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A code the engine may emit has no display label.
    #[error("No label for {field} code {code}")]
    MissingLabel { field: String, code: i64 },

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BikeshareError {
    /// Build an `InvalidFilterValue` error.
    pub fn invalid_filter(field: impl Into<String>, value: impl Into<String>) -> Self {
        BikeshareError::InvalidFilterValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type alias for bikeshare operations.
pub type Result<T> = std::result::Result<T, BikeshareError>;
