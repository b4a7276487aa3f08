//! Stable Store Error Hierarchy
//!
//! Keeps the three failure classes callers have to branch on apart:
//! a missing key, a storage failure (I/O or corrupted canonical file)
//! and invalid input or configuration.

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested key does not exist in the table
    #[error("Key not found")]
    NotFound,

    /// Disk I/O, corrupted state file or serialization failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Key/value encoding failures
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable failures: the store must not be used
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    /// Returns `true` when the error only signals an absent key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// Returns `true` when the canonical file could not be parsed.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Storage(StorageError::DataCorruption { .. }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures during read/write/sync/rename
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// I/O failure bound to the path it happened on
    #[error("Error occurred at path: {path}")]
    PathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Canonical file exists but does not hold a valid mapping
    #[error("Data corruption detected at {path}")]
    DataCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization failures for persisted data
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Error type for value conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Keys and values are stored as text and must be valid UTF-8
    #[error("invalid utf-8 in {field}")]
    InvalidUtf8 {
        field: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Generic conversion failure with detailed message
    ///
    /// Wraps underlying parsing/conversion errors with context information
    #[error("conversion failure: {0}")]
    ConversionFailure(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(StorageError::IoError(e))
    }
}
