//! Package identity and build inputs
//!
//! A built package arrives here fully assembled by the build stage and the
//! manifest system: identity fields, dependency/provision sets, hook and
//! trigger declarations, and the destination directories holding the
//! installed file set. Everything in this module is read-only input from the
//! publisher's point of view.

use std::path::PathBuf;

/// File extension for binary package artifacts
pub const PACKAGE_EXTENSION: &str = "apk";

/// Recognized lifecycle hook kinds, in recognition order
pub const HOOK_KINDS: [&str; 6] = [
    "pre-install",
    "post-install",
    "pre-upgrade",
    "post-upgrade",
    "pre-deinstall",
    "post-deinstall",
];

/// Suffix marking a debug-symbol package name
pub const DEBUG_SUFFIX: &str = "-dbg";

/// Identity of one binary artifact slot
///
/// The tuple (name, version, release, arch, debug) uniquely determines one
/// artifact path in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    /// Package name (sub-package name, not necessarily the owning package)
    pub name: String,

    /// Upstream version
    pub version: String,

    /// Release number
    pub release: u32,

    /// Target architecture
    pub arch: String,

    /// Whether this is an auto-generated debug-symbol variant
    pub debug: bool,
}

impl PackageIdentity {
    /// Format the combined version-release string (e.g. "1.2-r0")
    pub fn version_release(&self) -> String {
        format!("{}-r{}", self.version, self.release)
    }

    /// Name of the artifact as published, with the debug suffix applied
    pub fn artifact_name(&self) -> String {
        if self.debug {
            format!("{}{}", self.name, DEBUG_SUFFIX)
        } else {
            self.name.clone()
        }
    }

    /// Binary package file name (e.g. "foo-1.2-r0.apk" or "foo-dbg-1.2-r0.apk")
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.artifact_name(),
            self.version_release(),
            PACKAGE_EXTENSION
        )
    }

    /// The same slot, marked as the debug variant
    pub fn debug_variant(&self) -> Self {
        Self {
            debug: true,
            ..self.clone()
        }
    }
}

/// Declared capabilities a package offers or needs
///
/// Always present on a built package; emptiness of an individual list means
/// the corresponding metadata field is omitted entirely.
#[derive(Debug, Clone, Default)]
pub struct Provisions {
    /// Explicitly provided names
    pub provides: Vec<String>,

    /// Provider priority; only meaningful when greater than zero
    pub provider_priority: u32,

    /// Provided shared libraries as (soname, version) pairs
    pub shlib_provides: Vec<(String, String)>,

    /// Required shared library sonames
    pub shlib_requires: Vec<String>,

    /// Provided command names
    pub cmd_provides: Vec<String>,

    /// Provided pkg-config names
    pub pc_provides: Vec<String>,

    /// Required pkg-config names
    pub pc_requires: Vec<String>,
}

/// Source-control state of the build tree at build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRevision {
    /// Commit identifier
    pub commit: String,

    /// Whether the working tree had uncommitted changes
    pub dirty: bool,
}

impl SourceRevision {
    /// Commit label for metadata, with a "-dirty" suffix when applicable
    pub fn label(&self) -> String {
        if self.dirty {
            format!("{}-dirty", self.commit)
        } else {
            self.commit.clone()
        }
    }
}

/// A fully-built package ready for publication
///
/// Produced by the build stage and the manifest/template system; the
/// publisher never mutates it.
#[derive(Debug, Clone)]
pub struct BuiltPackage {
    /// Sub-package name
    pub name: String,

    /// Upstream version
    pub version: String,

    /// Release number
    pub release: u32,

    /// Declared package description
    pub description: String,

    /// Declared license expression
    pub license: String,

    /// Project URL, taken from the owning package
    pub url: String,

    /// Maintainer string, taken from the owning package
    pub maintainer: String,

    /// Owning top-level package name (distinct from the sub-package name)
    pub origin: String,

    /// Declared runtime dependencies
    pub depends: Vec<String>,

    /// Install-condition expressions, copied verbatim into metadata
    pub install_if: Vec<String>,

    /// Computed provision/requirement sets
    pub provisions: Provisions,

    /// Source-control revision of the build tree, when tracked
    pub revision: Option<SourceRevision>,

    /// Directory holding hook and trigger scripts for this package
    pub hooks_dir: PathBuf,

    /// Watched filesystem paths for the package trigger
    pub triggers: Vec<String>,

    /// Destination directory with the installed file set
    pub destdir: PathBuf,

    /// Separate staging directory collecting debug symbols, when produced
    pub debug_destdir: Option<PathBuf>,

    /// Build-state directory handed through to the archive backend
    pub state_dir: PathBuf,

    /// Fixed epoch shared across the whole build, for reproducible artifacts
    pub source_date_epoch: i64,

    /// Signing key reference for the archive backend
    pub signing_key: PathBuf,

    /// Names of all sub-packages of the owning package
    pub subpackages: Vec<String>,
}

impl BuiltPackage {
    /// Identity of this package's artifact slot for the given architecture
    pub fn identity(&self, arch: &str) -> PackageIdentity {
        PackageIdentity {
            name: self.name.clone(),
            version: self.version.clone(),
            release: self.release,
            arch: arch.to_string(),
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity() -> PackageIdentity {
        PackageIdentity {
            name: "foo".to_string(),
            version: "1.2".to_string(),
            release: 0,
            arch: "x86_64".to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_version_release() {
        assert_eq!(sample_identity().version_release(), "1.2-r0");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(sample_identity().file_name(), "foo-1.2-r0.apk");
    }

    #[test]
    fn test_debug_file_name() {
        let identity = sample_identity().debug_variant();
        assert_eq!(identity.artifact_name(), "foo-dbg");
        assert_eq!(identity.file_name(), "foo-dbg-1.2-r0.apk");
    }

    #[test]
    fn test_debug_variant_preserves_slot_fields() {
        let identity = sample_identity().debug_variant();
        assert_eq!(identity.name, "foo");
        assert_eq!(identity.version, "1.2");
        assert_eq!(identity.release, 0);
        assert_eq!(identity.arch, "x86_64");
        assert!(identity.debug);
    }

    #[test]
    fn test_revision_label() {
        let clean = SourceRevision {
            commit: "abc123".to_string(),
            dirty: false,
        };
        assert_eq!(clean.label(), "abc123");

        let dirty = SourceRevision {
            commit: "abc123".to_string(),
            dirty: true,
        };
        assert_eq!(dirty.label(), "abc123-dirty");
    }
}
