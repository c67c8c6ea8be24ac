use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building a tier report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be written to its destination.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer rejected the document.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header or from a short row.
    #[error("Missing required column \"{column}\" on line {line}")]
    MissingColumn { column: &'static str, line: u64 },

    /// A required field is present but blank.
    #[error("Empty value for \"{column}\" on line {line}")]
    EmptyField { column: &'static str, line: u64 },

    /// A date string did not match any recognised format.
    #[error("Invalid date \"{value}\" on line {line}")]
    DateParse { value: String, line: u64 },

    /// A price string is not an invariant-culture decimal.
    #[error("Invalid price \"{value}\" on line {line}")]
    PriceParse { value: String, line: u64 },

    /// A count metric name is not one of the recognised metrics.
    #[error("Invalid count metric: {0}")]
    InvalidCountMetric(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
