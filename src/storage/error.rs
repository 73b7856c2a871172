//! Error types for sample log operations

use thiserror::Error;

/// Result type alias for sample log operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while initializing or writing the sample log
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error (file access, disk full, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer rejected a record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The blocking I/O task died
    #[error("sample log task failed: {0}")]
    Task(String),

    /// The backing store cannot be used right now
    #[error("sample log unavailable: {0}")]
    Unavailable(String),
}
