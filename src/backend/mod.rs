//! Archive/signing backend boundary
//!
//! The actual archive encoding and cryptographic signing of artifacts live
//! outside this crate. The publisher hands a fully-formed request to an
//! implementation of [`ArchiveBackend`], which writes a signed archive at
//! the target path or fails with an opaque [`BackendError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::metadata::MetadataRecord;

/// Opaque failure from archive creation or signing
#[derive(Debug, Error)]
#[error("archive backend: {0}")]
pub struct BackendError(String);

impl BackendError {
    /// Wrap a backend-defined failure message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A validated, fully-formed publish request
///
/// Sealed by the orchestrator; the backend treats it as read-only.
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    /// Published package name, with the debug suffix applied for variants
    pub name: String,

    /// Combined version-release string (e.g. "1.2-r0")
    pub version_release: String,

    /// Target architecture
    pub arch: String,

    /// Reproducibility timestamp: a fixed epoch shared across the build
    pub build_time: i64,

    /// Destination directory holding the content to archive
    pub destdir: PathBuf,

    /// Build-state directory
    pub state_dir: PathBuf,

    /// Target artifact path inside the repository
    pub output_path: PathBuf,

    /// Signing key reference
    pub signing_key: PathBuf,

    /// Sealed metadata record
    pub metadata: MetadataRecord,
}

/// Backend producing signed binary artifacts
pub trait ArchiveBackend {
    /// Create and sign the artifact described by `request`
    fn create(&self, request: &ArchiveRequest) -> Result<(), BackendError>;
}

impl<T: ArchiveBackend + ?Sized> ArchiveBackend for std::sync::Arc<T> {
    fn create(&self, request: &ArchiveRequest) -> Result<(), BackendError> {
        (**self).create(request)
    }
}
