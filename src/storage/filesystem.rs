//! File system helpers
//!
//! Small synchronous helpers used during startup.

use std::fs;
use std::io::Result;
use std::path::Path;

/// Create a directory and any missing parents
pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}
