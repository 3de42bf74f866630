//! Storage root boundary checks
//!
//! Sanitization alone cannot see symlinks, so every path is resolved against
//! the filesystem and compared component-wise with the storage root right
//! before it is read or written.

use log::warn;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PathEscapeError;

/// Resolve a path to its canonical absolute form, following symlinks.
///
/// A path that does not exist yet (an upload target) resolves through its
/// canonical parent joined with its final component.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // A dangling symlink would be followed on write.
            if path.symlink_metadata().is_ok() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "dangling symlink cannot be resolved",
                ));
            }
            let parent = path
                .parent()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
            let file_name = path
                .file_name()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(parent.canonicalize()?.join(file_name))
        }
        Err(e) => Err(e),
    }
}

/// Pure containment test over two already-resolved paths.
pub fn is_contained(resolved_root: &Path, resolved_candidate: &Path) -> bool {
    resolved_candidate.starts_with(resolved_root)
}

/// Returns true iff `candidate` resolves to a location under `root`.
///
/// Paths that fail to resolve are never considered within the root.
pub fn is_within_root(root: &Path, candidate: &Path) -> bool {
    match (resolve(root), resolve(candidate)) {
        (Ok(root), Ok(candidate)) => is_contained(&root, &candidate),
        (Err(e), _) | (_, Err(e)) => {
            warn!(
                "Failed to resolve {} against root {}: {}",
                candidate.display(),
                root.display(),
                e
            );
            false
        }
    }
}

/// Join a sanitized name onto the root and verify the result stays inside.
pub fn confine(root: &Path, name: &str) -> Result<PathBuf, PathEscapeError> {
    let candidate = root.join(name);
    if is_within_root(root, &candidate) {
        Ok(candidate)
    } else {
        Err(PathEscapeError { candidate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_contained_is_component_wise() {
        let root = Path::new("/srv/uploads");
        assert!(is_contained(root, Path::new("/srv/uploads/a.txt")));
        assert!(is_contained(root, Path::new("/srv/uploads")));
        assert!(!is_contained(root, Path::new("/srv/uploads-evil/a.txt")));
        assert!(!is_contained(root, Path::new("/srv/a.txt")));
    }

    #[test]
    fn test_existing_and_new_files_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("present.txt"), b"x").unwrap();

        assert!(is_within_root(dir.path(), &dir.path().join("present.txt")));
        assert!(is_within_root(dir.path(), &dir.path().join("absent.txt")));
    }

    #[test]
    fn test_dot_dot_escape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(dir.path().join("outside.txt"), b"secret").unwrap();

        assert!(!is_within_root(&root, &root.join("../outside.txt")));
        assert!(!is_within_root(&root, &root.join("../../etc/passwd")));
        assert!(confine(&root, "../outside.txt").is_err());
    }

    #[test]
    fn test_missing_parent_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_within_root(dir.path(), &dir.path().join("nope/deeper.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        let secret = dir.path().join("secret.txt");
        fs::write(&secret, b"secret").unwrap();
        std::os::unix::fs::symlink(&secret, root.join("link.txt")).unwrap();

        assert!(!is_within_root(&root, &root.join("link.txt")));
        assert!(confine(&root, "link.txt").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(dir.path().join("not-yet.txt"), root.join("trap.txt")).unwrap();

        assert!(!is_within_root(&root, &root.join("trap.txt")));
    }

    #[test]
    fn test_confine_returns_joined_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = confine(dir.path(), "evil.txt").unwrap();
        assert_eq!(path, dir.path().join("evil.txt"));
    }
}
