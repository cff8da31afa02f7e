use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the ZIP lens crates.
#[derive(Error, Debug)]
pub enum LensError {
    /// A data file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be decoded.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A required column is absent from a CSV header row.
    #[error("Missing column {column:?} in {path}")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },

    /// A vaccination type string is neither "partial" nor "full".
    #[error("Invalid vaccination type: {0}")]
    InvalidKind(String),

    /// A data file named on the command line does not exist or is not a file.
    #[error("Data file not found: {0}")]
    DataFileNotFound(PathBuf),

    /// The interaction log file could not be opened for appending.
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the lens crates.
pub type Result<T> = std::result::Result<T, LensError>;
