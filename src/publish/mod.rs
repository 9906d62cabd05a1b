//! Publish orchestration
//!
//! Sequences one package's publication: resolve the repository slot, check
//! the destination directory, acquire the slot lock, assemble metadata,
//! invoke the archive backend, release the lock. The cycle runs once for
//! the main artifact and, when the debug planner says so, once more for the
//! auto-generated debug variant. The two cycles never overlap; the main
//! artifact's lock is released before the debug cycle begins.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use thiserror::Error;

use crate::backend::{ArchiveBackend, ArchiveRequest, BackendError};
use crate::debuginfo::{plan_debug, DebugDecision};
use crate::lock::{LockError, MarkerLock, SlotLock};
use crate::metadata::{assemble, MetadataError};
use crate::package::{BuiltPackage, PackageIdentity};
use crate::repo::{resolve_slot, PathError, ResolvedSlot};

/// Publication errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("path resolution error: {0}")]
    Path(#[from] PathError),

    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Outcome of one artifact's publication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The artifact was handed to the backend and written
    Published {
        /// Artifact path inside the repository
        path: PathBuf,

        /// Binary package file name
        file_name: String,

        /// When the backend invocation completed
        created_at: DateTime<Utc>,
    },

    /// The destination directory was missing; nothing was built to publish
    Skipped {
        /// Binary package file name that would have been written
        file_name: String,
    },
}

impl ArtifactOutcome {
    /// Whether this artifact was actually published
    pub fn is_published(&self) -> bool {
        matches!(self, ArtifactOutcome::Published { .. })
    }
}

/// Report for one package's full publication run
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Outcome for the main artifact
    pub main: ArtifactOutcome,

    /// Outcome for the debug artifact, when one was planned
    pub debug: Option<ArtifactOutcome>,
}

/// Publish orchestrator
///
/// Parameterized by the repository root and target architecture it writes
/// to; repository state is never reached through ambient context. The
/// backend and lock implementations are injected at the seams.
pub struct Publisher<B: ArchiveBackend, L: SlotLock = MarkerLock> {
    repo_root: PathBuf,
    arch: String,
    backend: B,
    lock: L,
}

impl<B: ArchiveBackend> Publisher<B, MarkerLock> {
    /// Create a publisher using the default marker-file lock
    pub fn new(repo_root: impl Into<PathBuf>, arch: impl Into<String>, backend: B) -> Self {
        Self::with_lock(repo_root, arch, backend, MarkerLock::new())
    }
}

impl<B: ArchiveBackend, L: SlotLock> Publisher<B, L> {
    /// Create a publisher with an explicit lock implementation
    pub fn with_lock(
        repo_root: impl Into<PathBuf>,
        arch: impl Into<String>,
        backend: B,
        lock: L,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            arch: arch.into(),
            backend,
            lock,
        }
    }

    /// Backend reference, for inspection in tests
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Publish the main artifact and, when planned, its debug counterpart
    ///
    /// The debug cycle starts only after the main cycle has fully completed,
    /// including lock release. A missing main destination directory skips
    /// the main artifact but does not suppress the debug attempt.
    pub fn publish(&self, pkg: &BuiltPackage) -> PublishResult<PublishReport> {
        let main = self.publish_artifact(pkg, &pkg.destdir, pkg.identity(&self.arch))?;

        let debug = match plan_debug(pkg) {
            DebugDecision::Publish(destdir) => {
                let identity = pkg.identity(&self.arch).debug_variant();
                Some(self.publish_artifact(pkg, &destdir, identity)?)
            }
            DebugDecision::ExplicitSubpackage | DebugDecision::NoDebugFiles => None,
        };

        Ok(PublishReport { main, debug })
    }

    /// Run one artifact's full cycle
    fn publish_artifact(
        &self,
        pkg: &BuiltPackage,
        destdir: &Path,
        identity: PackageIdentity,
    ) -> PublishResult<ArtifactOutcome> {
        let slot = resolve_slot(&self.repo_root, &identity)?;

        if !destdir.is_dir() {
            warn!("cannot find destdir for {}, skipping...", slot.file_name);
            return Ok(ArtifactOutcome::Skipped {
                file_name: slot.file_name,
            });
        }

        let guard = self.lock.acquire(&slot.path)?;
        let worked = self.invoke_backend(pkg, destdir, &identity, &slot);
        match worked {
            Ok(()) => {
                self.lock.release(guard)?;
                Ok(ArtifactOutcome::Published {
                    path: slot.path,
                    file_name: slot.file_name,
                    created_at: Utc::now(),
                })
            }
            // The guard drop removes the marker; the work error wins
            Err(err) => Err(err),
        }
    }

    /// Assemble metadata and hand the sealed request to the backend
    fn invoke_backend(
        &self,
        pkg: &BuiltPackage,
        destdir: &Path,
        identity: &PackageIdentity,
        slot: &ResolvedSlot,
    ) -> PublishResult<()> {
        let metadata = assemble(pkg, identity.debug)?;

        let request = ArchiveRequest {
            name: identity.artifact_name(),
            version_release: identity.version_release(),
            arch: self.arch.clone(),
            build_time: pkg.source_date_epoch,
            destdir: destdir.to_path_buf(),
            state_dir: pkg.state_dir.clone(),
            output_path: slot.path.clone(),
            signing_key: pkg.signing_key.clone(),
            metadata,
        };

        info!(
            "creating {} in repository {}...",
            slot.file_name,
            slot.dir.display()
        );
        self.backend.create(&request)?;
        Ok(())
    }
}
