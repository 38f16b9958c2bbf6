//! Core error types

use thiserror::Error;

/// Errors raised by the folio core runtime
#[derive(Error, Debug)]
pub enum FolioError {
    /// Reading or writing a storage backend failed
    #[error("Storage I/O failed: {0}")]
    StorageIo(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Storage value is not valid JSON: {0}")]
    StorageFormat(#[from] serde_json::Error),

    /// A trigger position string could not be parsed
    #[error("Invalid trigger position '{0}'")]
    InvalidTrigger(String),

    /// An option value was out of range
    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, FolioError>;
