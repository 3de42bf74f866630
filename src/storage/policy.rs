//! Upload policy
//!
//! Decides whether an upload is acceptable from its name and size alone.

use std::collections::BTreeSet;

use crate::error::RejectReason;

pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 7] = ["txt", "pdf", "png", "jpg", "jpeg", "gif", "docx"];
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Extension allow-list plus a maximum upload size in bytes.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: BTreeSet<String>,
    max_size_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE)
    }
}

impl UploadPolicy {
    pub fn new<I, S>(allowed_extensions: I, max_size_bytes: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_size_bytes,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Allowed extensions in sorted order, for display.
    pub fn allowed_extensions(&self) -> impl Iterator<Item = &str> {
        self.allowed_extensions.iter().map(String::as_str)
    }

    /// Accept or reject an upload. Size is checked before extension; each
    /// failure carries its own reason.
    pub fn accept(&self, filename: &str, size_bytes: u64) -> Result<(), RejectReason> {
        if size_bytes > self.max_size_bytes {
            return Err(RejectReason::TooLarge {
                size: size_bytes,
                max: self.max_size_bytes,
            });
        }

        match extension_of(filename) {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            Some(ext) => Err(RejectReason::BadExtension(ext)),
            None => Err(RejectReason::BadExtension(String::new())),
        }
    }
}

/// Lower-cased substring after the last `.`, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_extensions_case_insensitively() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.accept("notes.txt", 10), Ok(()));
        assert_eq!(policy.accept("PHOTO.JPG", 10), Ok(()));
        assert_eq!(policy.accept("scan.Pdf", 0), Ok(()));
        assert_eq!(policy.accept("archive.tar.docx", 10), Ok(()));
    }

    #[test]
    fn test_rejects_unlisted_extension_regardless_of_size() {
        let policy = UploadPolicy::default();
        for size in [0, 1, DEFAULT_MAX_FILE_SIZE] {
            assert_eq!(
                policy.accept("malicious.php", size),
                Err(RejectReason::BadExtension("php".into()))
            );
        }
        assert_eq!(
            policy.accept("shell.txt.exe", 1),
            Err(RejectReason::BadExtension("exe".into()))
        );
        assert_eq!(
            policy.accept("README", 1),
            Err(RejectReason::BadExtension(String::new()))
        );
    }

    #[test]
    fn test_rejects_oversize_regardless_of_extension() {
        let policy = UploadPolicy::default();
        let over = DEFAULT_MAX_FILE_SIZE + 1;
        for name in ["a.txt", "b.png", "c.exe", "noext"] {
            assert!(matches!(
                policy.accept(name, over),
                Err(RejectReason::TooLarge { .. })
            ));
        }
    }

    #[test]
    fn test_max_size_is_inclusive() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.accept("big.png", DEFAULT_MAX_FILE_SIZE), Ok(()));
    }

    #[test]
    fn test_custom_policy_normalises_extensions() {
        let policy = UploadPolicy::new([".CSV", "md"], 4);
        assert_eq!(policy.accept("data.csv", 4), Ok(()));
        assert_eq!(policy.accept("doc.MD", 1), Ok(()));
        assert!(policy.accept("img.png", 1).is_err());
        assert_eq!(
            policy.accept("data.csv", 5),
            Err(RejectReason::TooLarge { size: 5, max: 4 })
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.b.TXT").as_deref(), Some("txt"));
        assert_eq!(extension_of("plain"), None);
    }
}
