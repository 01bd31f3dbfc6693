//! Error types for ns-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ns-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Spreadsheet could not be opened or decoded
    #[error("failed to load workbook '{path}': {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Requested worksheet does not exist
    #[error("worksheet '{name}' not found in '{path}'")]
    SheetNotFound { name: String, path: PathBuf },

    /// Workbook has no worksheets at all
    #[error("workbook '{0}' contains no worksheets")]
    EmptyWorkbook(PathBuf),

    /// A cell holds a spreadsheet error value (e.g. `#REF!`)
    #[error("cell ({row}, {column}) holds an error value: {message}")]
    CellError {
        row: u32,
        column: u32,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
