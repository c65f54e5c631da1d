//! Errors raised while writing or reading episode records

use thiserror::Error;

/// Failures of the columnar record layer
#[derive(Error, Debug)]
pub enum RecordError {
    /// A table could not be assembled from its columns
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// The Parquet writer or reader failed
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A table lacks a column or stores it with another type
    #[error("Column `{0}` is missing or has an unexpected type")]
    Column(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for record operations
pub type RecordResult<T> = std::result::Result<T, RecordError>;
