//! Storage result types
//!
//! Defines result structures returned by storage operations.

use tokio::fs::File;

use crate::storage::policy::extension_of;

/// A file held under the storage root, identified by its sanitized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub extension: Option<String>,
}

impl StoredFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let extension = extension_of(&name);
        Self {
            name,
            size,
            extension,
        }
    }
}

/// Result of a file retrieval: an open handle ready to be streamed.
#[derive(Debug)]
pub struct RetrievedFile {
    pub file: File,
    pub stored: StoredFile,
}
