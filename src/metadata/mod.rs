//! Package metadata record and assembly
//!
//! The metadata record is the structured payload sealed into the binary
//! artifact alongside the package contents. Field order is the wire order
//! and field *presence* is meaningful to the archive backend: optional
//! fields are omitted entirely rather than emitted empty.

mod assemble;

pub use assemble::{assemble, MetadataError};

use serde::Serialize;
use std::path::PathBuf;

/// A lifecycle hook script reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookScript {
    /// Resolved path of the script on disk
    pub script: PathBuf,

    /// Recognized hook kind (e.g. "post-install")
    pub kind: String,
}

/// Sealed metadata record for one binary artifact
///
/// Assembled all-or-nothing by [`assemble`] and never mutated after handoff
/// to the archive backend. Serialization order follows field declaration
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    /// Package description, with " (debug files)" appended for debug variants
    pub pkgdesc: String,

    /// Project URL
    pub url: String,

    /// Maintainer string
    pub maintainer: String,

    /// Owning top-level package name
    pub origin: String,

    /// License expression
    pub license: String,

    /// Source-control commit, suffixed "-dirty" for modified build trees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// Provided names, sorted (main artifacts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provides: Option<Vec<String>>,

    /// Provider priority, only when greater than zero (main artifacts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_priority: Option<u32>,

    /// Runtime dependencies, sorted; debug variants carry exactly one entry
    /// pinning the main package
    pub depends: Vec<String>,

    /// Install-condition expressions, verbatim (may be empty)
    pub install_if: Vec<String>,

    /// Provided shared libraries as (soname, version) pairs, sorted by soname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shlib_provides: Option<Vec<(String, String)>>,

    /// Required shared library sonames, sorted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shlib_requires: Option<Vec<String>>,

    /// Provided pkg-config names, sorted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_provides: Option<Vec<String>>,

    /// Provided command names, sorted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd_provides: Option<Vec<String>>,

    /// Required pkg-config names, sorted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_requires: Option<Vec<String>>,

    /// Lifecycle hook scripts that exist on disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Vec<HookScript>>,

    /// Resolved trigger script path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<PathBuf>,

    /// Watched filesystem paths for the trigger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
}
