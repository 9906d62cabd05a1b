//! Debug variant planning
//!
//! Decides whether an automatic `<name>-dbg` artifact is published alongside
//! the main one. An explicitly declared debug sub-package of the owning
//! package suppresses auto-generation so one logical name is never published
//! twice; otherwise auto-generation proceeds only when the build stage left
//! a debug staging directory on disk.

use std::path::PathBuf;

use log::debug;

use crate::package::{BuiltPackage, DEBUG_SUFFIX};

/// Outcome of debug variant planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugDecision {
    /// Publish an auto-generated debug artifact from this staging directory
    Publish(PathBuf),

    /// An explicit `<origin>-dbg` sub-package owns the debug artifact
    ExplicitSubpackage,

    /// No debug staging directory exists; nothing to publish
    NoDebugFiles,
}

impl DebugDecision {
    /// Staging directory for the debug artifact, when one is to be published
    pub fn destdir(&self) -> Option<&PathBuf> {
        match self {
            DebugDecision::Publish(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Decide whether to auto-publish a debug artifact for this package
pub fn plan_debug(pkg: &BuiltPackage) -> DebugDecision {
    let explicit = format!("{}{}", pkg.origin, DEBUG_SUFFIX);
    if pkg.subpackages.iter().any(|sp| *sp == explicit) {
        debug!(
            "explicit {} sub-package exists, not auto-generating",
            explicit
        );
        return DebugDecision::ExplicitSubpackage;
    }

    match &pkg.debug_destdir {
        Some(dir) if dir.is_dir() => DebugDecision::Publish(dir.clone()),
        _ => {
            debug!("no debug destdir for {}, nothing to publish", pkg.name);
            DebugDecision::NoDebugFiles
        }
    }
}
