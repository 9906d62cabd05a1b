//! Cooperative slot locking
//!
//! Mutual exclusion over a single artifact path, using a filesystem-visible
//! marker file co-located with the artifact. The lock is advisory: every
//! writer of a given path must go through this module. Contention only
//! arises when the identical package/version/release/arch is published twice
//! concurrently, so the lock is per-path, not global.
//!
//! The marker is created atomically and removed unconditionally when the
//! protected work ends, on every exit path. Acquisition busy-waits with a
//! fixed poll interval and no timeout: a competing writer is expected to
//! finish within one artifact-write duration. A crashed holder leaves a
//! stuck marker that must be removed out of band.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::warn;
use thiserror::Error;

/// File suffix appended to the artifact file name to form the marker name
pub const MARKER_SUFFIX: &str = "lock";

/// Default delay between acquisition attempts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors during lock handling
#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to create lock marker {marker}: {source}")]
    Create {
        /// The marker path that could not be created
        marker: PathBuf,
        source: io::Error,
    },

    #[error("failed to remove lock marker {marker}: {source}")]
    Release {
        /// The marker path that could not be removed
        marker: PathBuf,
        source: io::Error,
    },
}

/// Marker path for an artifact path (`foo-1.2-r0.apk` -> `foo-1.2-r0.apk.lock`)
pub fn marker_path(artifact_path: &Path) -> PathBuf {
    let mut name = artifact_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(MARKER_SUFFIX);
    artifact_path.with_file_name(name)
}

/// Capability interface for per-path mutual exclusion
///
/// Isolates the backing primitive so an alternative (e.g. an OS-level
/// advisory lock) can be substituted without touching the orchestrator.
/// The guard releases the lock when dropped.
pub trait SlotLock {
    /// Guard type holding the acquired lock
    type Guard;

    /// Block until the lock for `artifact_path` is held
    fn acquire(&self, artifact_path: &Path) -> Result<Self::Guard, LockError>;

    /// Release a held lock, reporting failures
    fn release(&self, guard: Self::Guard) -> Result<(), LockError>;
}

/// Marker-file lock with bounded-patience busy-waiting
#[derive(Debug, Clone)]
pub struct MarkerLock {
    poll_interval: Duration,
}

impl MarkerLock {
    /// Create a lock with the default one-second poll interval
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval (mainly for tests)
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for MarkerLock {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotLock for MarkerLock {
    type Guard = MarkerGuard;

    fn acquire(&self, artifact_path: &Path) -> Result<MarkerGuard, LockError> {
        let marker = marker_path(artifact_path);

        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&marker)
            {
                Ok(_) => return Ok(MarkerGuard { marker }),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    warn!(
                        "binary package {} being created, waiting...",
                        artifact_path.display()
                    );
                    thread::sleep(self.poll_interval);
                }
                Err(source) => {
                    return Err(LockError::Create { marker, source });
                }
            }
        }
    }

    fn release(&self, guard: MarkerGuard) -> Result<(), LockError> {
        guard.release()
    }
}

/// Held lock over one artifact path
///
/// Removes the marker on drop; `release` reports removal failures on the
/// success path.
#[derive(Debug)]
pub struct MarkerGuard {
    marker: PathBuf,
}

impl MarkerGuard {
    /// Path of the held marker file
    pub fn marker(&self) -> &Path {
        &self.marker
    }

    /// Release the lock, reporting removal failures
    pub fn release(self) -> Result<(), LockError> {
        let marker = self.marker.clone();
        // Drop must not remove the marker a second time
        std::mem::forget(self);
        fs::remove_file(&marker).map_err(|source| LockError::Release { marker, source })
    }
}

impl Drop for MarkerGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.marker) {
            warn!(
                "failed to remove lock marker {}: {}",
                self.marker.display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    fn fast_lock() -> MarkerLock {
        MarkerLock::new().with_poll_interval(Duration::from_millis(10))
    }

    #[test]
    fn test_marker_path_suffix() {
        let marker = marker_path(Path::new("/repo/x86_64/foo-1.2-r0.apk"));
        assert_eq!(marker, PathBuf::from("/repo/x86_64/foo-1.2-r0.apk.lock"));
    }

    #[test]
    fn test_acquire_creates_marker() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("foo-1.2-r0.apk");

        let guard = fast_lock().acquire(&artifact).unwrap();
        assert!(guard.marker().is_file());
        assert_eq!(guard.marker(), dir.path().join("foo-1.2-r0.apk.lock"));
    }

    #[test]
    fn test_release_removes_marker() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("foo-1.2-r0.apk");

        let guard = fast_lock().acquire(&artifact).unwrap();
        let marker = guard.marker().to_path_buf();
        guard.release().unwrap();
        assert!(!marker.exists());
    }

    #[test]
    fn test_drop_removes_marker() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("foo-1.2-r0.apk");
        let marker;

        {
            let guard = fast_lock().acquire(&artifact).unwrap();
            marker = guard.marker().to_path_buf();
        }
        assert!(!marker.exists());
    }

    #[test]
    fn test_waits_for_existing_marker() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("foo-1.2-r0.apk");
        let marker = marker_path(&artifact);

        // Simulate a competing writer holding the marker
        fs::write(&marker, b"").unwrap();

        let releaser = {
            let marker = marker.clone();
            std::thread::spawn(move || {
                thread::sleep(Duration::from_millis(60));
                fs::remove_file(&marker).unwrap();
            })
        };

        let started = Instant::now();
        let guard = fast_lock().acquire(&artifact).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(guard.marker().is_file());

        releaser.join().unwrap();
    }

    #[test]
    fn test_acquire_fails_without_parent_directory() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("missing/foo-1.2-r0.apk");

        let err = fast_lock().acquire(&artifact).unwrap_err();
        assert!(matches!(err, LockError::Create { .. }));
    }

    #[test]
    fn test_sequential_reacquisition() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("foo-1.2-r0.apk");
        let lock = fast_lock();

        let first = lock.acquire(&artifact).unwrap();
        first.release().unwrap();
        let second = lock.acquire(&artifact).unwrap();
        second.release().unwrap();
    }
}
