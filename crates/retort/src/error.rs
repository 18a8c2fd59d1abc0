//! Error types for the Retort library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::ColumnType;

/// Main error type for Retort operations.
///
/// Every transformation error is recoverable at the operation boundary:
/// the operation fails and the input table is left untouched.
#[derive(Debug, Error)]
pub enum RetortError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unsupported input data.
    #[error("Format error: {0}")]
    Format(String),

    /// A table invariant or operation parameter was violated.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A referenced column does not exist in the current schema.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A cell could not be cast to the requested type.
    #[error("Cannot convert '{value}' in column '{column}' (row {row}) to {target}")]
    Conversion {
        column: String,
        row: usize,
        value: String,
        target: ColumnType,
    },

    /// Invalid arithmetic in a calculated column or normalization.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Statistics requested on a column with no non-null values.
    #[error("Column '{0}' has no non-null values")]
    EmptyColumn(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<csv::Error> for RetortError {
    fn from(err: csv::Error) -> Self {
        RetortError::Format(err.to_string())
    }
}

/// Result type alias for Retort operations.
pub type Result<T> = std::result::Result<T, RetortError>;
