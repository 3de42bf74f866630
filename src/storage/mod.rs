//! File storage management
//!
//! The safety boundary (sanitizer, boundary checker, upload policy) and the
//! gateway that performs the actual file I/O behind it.

pub mod boundary;
pub mod filesystem;
pub mod operations;
pub mod policy;
pub mod results;
pub mod validation;

pub use boundary::{confine, is_contained, is_within_root};
pub use operations::{StorageGateway, StoredFiles};
pub use policy::UploadPolicy;
pub use results::{RetrievedFile, StoredFile};
pub use validation::sanitize;
