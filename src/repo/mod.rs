//! Repository path resolution
//!
//! Computes the destination path for a binary artifact inside the shared
//! repository tree and ensures the containing directories exist. Main
//! artifacts live under `<root>/<arch>`, debug artifacts under
//! `<root>/debug/<arch>`, so main and debug variants of the same package
//! never share a path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::package::{PackageIdentity, DEBUG_SUFFIX};

/// Directory level separating debug artifacts from main artifacts
pub const DEBUG_DIR: &str = "debug";

/// Errors during path resolution
#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to create repository directory {dir}: {source}")]
    CreateDir {
        /// The directory that could not be created
        dir: PathBuf,
        source: io::Error,
    },
}

/// Resolved artifact slot within the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    /// Containing directory (exists after resolution)
    pub dir: PathBuf,

    /// Binary package file name
    pub file_name: String,

    /// Absolute artifact path (`dir` joined with `file_name`)
    pub path: PathBuf,
}

/// Resolve the artifact path for an identity, creating directories as needed
///
/// Debug variants are placed under the `debug/` level, as are packages whose
/// name itself carries the debug suffix: an explicitly declared `foo-dbg`
/// sub-package publishes into the debug tree under its own name.
pub fn resolve_slot(
    repo_root: &Path,
    identity: &PackageIdentity,
) -> Result<ResolvedSlot, PathError> {
    let mut dir = repo_root.to_path_buf();

    if identity.debug || identity.name.ends_with(DEBUG_SUFFIX) {
        dir.push(DEBUG_DIR);
    }
    dir.push(&identity.arch);

    fs::create_dir_all(&dir).map_err(|source| PathError::CreateDir {
        dir: dir.clone(),
        source,
    })?;

    let file_name = identity.file_name();
    let path = dir.join(&file_name);

    Ok(ResolvedSlot {
        dir,
        file_name,
        path,
    })
}
