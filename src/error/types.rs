//! Error types
//!
//! Defines domain-specific error types for each module of the file vault.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Filename sanitization errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidNameError {
    #[error("Filename is empty after sanitization")]
    Empty,
    #[error("Filename still contains a path separator: {0}")]
    ContainsSeparator(String),
}

/// Boundary check failure: the resolved path is not under the storage root.
#[derive(Debug, Error)]
#[error("Path escapes storage root: {}", .candidate.display())]
pub struct PathEscapeError {
    pub candidate: PathBuf,
}

/// Upload policy rejections
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("File type not allowed: {0}")]
    BadExtension(String),
    #[error("File too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// Storage gateway errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Authentication errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials for user: {0}")]
    InvalidCredentials(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Top-level error that encompasses all error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid filename: {0}")]
    InvalidName(#[from] InvalidNameError),
    #[error("{0}")]
    PathEscape(#[from] PathEscapeError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    /// Maps an io error, turning `NotFound` into the gateway's own variant.
    pub fn from_io(err: io::Error, name: &str) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(name.to_string())
        } else {
            StorageError::Io(err)
        }
    }
}
