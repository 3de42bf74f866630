//! Storage operations
//!
//! Reads, writes and lists files directly under the storage root. Names must
//! already have been sanitized and boundary-checked by the caller; nothing
//! here re-validates them.

use log::{debug, error, info};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, ReadDir};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::filesystem::create_directory;
use crate::storage::results::{RetrievedFile, StoredFile};

/// Gateway to the flat directory of uploaded files.
#[derive(Debug, Clone)]
pub struct StorageGateway {
    root: PathBuf,
}

impl StorageGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<(), StorageError> {
        create_directory(&self.root)?;
        info!("Storage root directory: {}", self.root.display());
        Ok(())
    }

    /// Writes `bytes` to `root/name`, replacing any existing file.
    ///
    /// Data lands in a hidden temporary file first and is renamed into place,
    /// so a concurrent reader sees either the old or the new content.
    pub async fn store(&self, name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        let final_path = self.root.join(name);
        // The temp name stays short so any name the sanitizer allows still fits.
        let temp_path = self.root.join(format!(".{}.part", Uuid::new_v4().simple()));

        if let Err(e) = write_file(&temp_path, bytes).await {
            error!("Failed to write temporary file {}: {}", temp_path.display(), e);
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(e));
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            error!(
                "Failed to move {} into place at {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            );
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::Io(e));
        }

        info!("Stored file {} ({} bytes)", final_path.display(), bytes.len());
        Ok(StoredFile::new(name, bytes.len() as u64))
    }

    /// Opens `root/name` for reading.
    pub async fn retrieve(&self, name: &str) -> Result<RetrievedFile, StorageError> {
        let path = self.root.join(name);
        let file = File::open(&path)
            .await
            .map_err(|e| StorageError::from_io(e, name))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| StorageError::from_io(e, name))?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        debug!("Opened {} for retrieval", path.display());
        Ok(RetrievedFile {
            file,
            stored: StoredFile::new(name, metadata.len()),
        })
    }

    /// Lazily enumerates stored files in directory order.
    ///
    /// Fails with `NotFound` when the root itself is missing.
    pub async fn list(&self) -> Result<StoredFiles, StorageError> {
        let entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::from_io(e, &self.root.to_string_lossy()))?;
        Ok(StoredFiles { entries })
    }
}

/// Lazy, unordered sequence of stored files.
#[derive(Debug)]
pub struct StoredFiles {
    entries: ReadDir,
}

impl StoredFiles {
    /// Next regular, non-hidden file, or `None` once the directory is exhausted.
    pub async fn next(&mut self) -> Result<Option<StoredFile>, StorageError> {
        while let Some(entry) = self.entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => {
                    return Ok(Some(StoredFile::new(name, metadata.len())));
                }
                Ok(_) => continue,
                Err(e) => {
                    debug!("Skipping {}: {}", name, e);
                    continue;
                }
            }
        }
        Ok(None)
    }

    /// Drain the remaining entries.
    pub async fn collect(mut self) -> Result<Vec<StoredFile>, StorageError> {
        let mut files = Vec::new();
        while let Some(file) = self.next().await? {
            files.push(file);
        }
        Ok(files)
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_store_then_retrieve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(dir.path());
        let content = b"\x00\x01binary\xffcontent";

        let stored = gateway.store("blob.png", content).await.unwrap();
        assert_eq!(stored, StoredFile::new("blob.png", content.len() as u64));

        let mut retrieved = gateway.retrieve("blob.png").await.unwrap();
        let mut buf = Vec::new();
        retrieved.file.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, content);
        assert_eq!(retrieved.stored.size, content.len() as u64);
    }

    #[tokio::test]
    async fn test_store_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(dir.path());

        gateway.store("a.txt", b"first").await.unwrap();
        gateway.store("a.txt", b"second").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"second");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn test_store_accepts_longest_sanitized_names() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(dir.path());

        for name in ["a".repeat(240) + ".txt", "b".repeat(251) + ".txt"] {
            let stored = gateway.store(&name, b"long").await.unwrap();
            assert_eq!(stored.name, name);
            assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), b"long");
        }
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(dir.path());
        assert!(matches!(
            gateway.retrieve("ghost.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_retrieve_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let gateway = StorageGateway::new(dir.path());
        assert!(matches!(
            gateway.retrieve("sub").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_skips_hidden_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), b"1").unwrap();
        std::fs::write(dir.path().join("two.pdf"), b"22").unwrap();
        std::fs::write(dir.path().join(".upload.part"), b"partial").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let gateway = StorageGateway::new(dir.path());
        let mut files = gateway.list().await.unwrap().collect().await.unwrap();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            files,
            vec![StoredFile::new("one.txt", 1), StoredFile::new("two.pdf", 2)]
        );
    }

    #[tokio::test]
    async fn test_list_missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(dir.path().join("missing"));
        assert!(matches!(
            gateway.list().await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_ensure_root_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(dir.path().join("a/b"));
        gateway.ensure_root().unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }
}
