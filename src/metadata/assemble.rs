//! Metadata assembly
//!
//! Derives a complete, validated [`MetadataRecord`] from a built package.
//! Assembly is all-or-nothing: any validation failure yields an error and no
//! partial record. Inputs are never mutated; lists are copied and sorted
//! before inclusion.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{HookScript, MetadataRecord};
use crate::package::{BuiltPackage, HOOK_KINDS};

/// Errors during metadata assembly
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid trigger path: {0}")]
    InvalidTriggerPath(String),

    #[error("trigger script does not exist: {0}")]
    MissingTriggerScript(PathBuf),
}

/// Assemble the sealed metadata record for one artifact
///
/// With `debug` set, the record describes the auto-generated debug-symbol
/// variant: the description gains a suffix, the dependency list pins the
/// exact version-release of the main package, and provisions, hooks and
/// triggers are never carried.
pub fn assemble(pkg: &BuiltPackage, debug: bool) -> Result<MetadataRecord, MetadataError> {
    let mut pkgdesc = pkg.description.clone();
    if debug {
        pkgdesc.push_str(" (debug files)");
    }

    let depends = if debug {
        vec![format!("{}={}-r{}", pkg.name, pkg.version, pkg.release)]
    } else {
        sorted(&pkg.depends)
    };

    let mut record = MetadataRecord {
        pkgdesc,
        url: pkg.url.clone(),
        maintainer: pkg.maintainer.clone(),
        origin: pkg.origin.clone(),
        license: pkg.license.clone(),
        commit: pkg.revision.as_ref().map(|rev| rev.label()),
        provides: None,
        provider_priority: None,
        depends,
        install_if: pkg.install_if.clone(),
        shlib_provides: None,
        shlib_requires: None,
        pc_provides: None,
        cmd_provides: None,
        pc_requires: None,
        hooks: None,
        trigger: None,
        triggers: None,
    };

    if !debug {
        let prov = &pkg.provisions;

        record.provides = non_empty(sorted(&prov.provides));
        if prov.provider_priority > 0 {
            record.provider_priority = Some(prov.provider_priority);
        }

        if !prov.shlib_provides.is_empty() {
            let mut pairs = prov.shlib_provides.clone();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            record.shlib_provides = Some(pairs);
        }
        record.shlib_requires = non_empty(sorted(&prov.shlib_requires));
        record.pc_provides = non_empty(sorted(&prov.pc_provides));
        record.cmd_provides = non_empty(sorted(&prov.cmd_provides));
        record.pc_requires = non_empty(sorted(&prov.pc_requires));

        record.hooks = non_empty(existing_hooks(pkg));

        if !pkg.triggers.is_empty() {
            let (trigger, triggers) = validate_triggers(pkg)?;
            record.trigger = Some(trigger);
            record.triggers = Some(triggers);
        }
    }

    Ok(record)
}

/// Sorted copy of a string list
fn sorted(items: &[String]) -> Vec<String> {
    let mut copy = items.to_vec();
    copy.sort();
    copy
}

/// Wrap a list in Some only when it has entries
fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Collect the recognized hook scripts that exist on disk
fn existing_hooks(pkg: &BuiltPackage) -> Vec<HookScript> {
    let mut hooks = Vec::new();

    for kind in HOOK_KINDS {
        let script = pkg.hooks_dir.join(format!("{}.{}", pkg.name, kind));
        if script.is_file() {
            hooks.push(HookScript {
                script: resolve_script(&script),
                kind: kind.to_string(),
            });
        }
    }

    hooks
}

/// Validate trigger declarations and resolve the trigger script
fn validate_triggers(pkg: &BuiltPackage) -> Result<(PathBuf, Vec<String>), MetadataError> {
    for path in &pkg.triggers {
        if path.is_empty() || !Path::new(path).is_absolute() {
            return Err(MetadataError::InvalidTriggerPath(path.clone()));
        }
    }

    // Triggers are only meaningful if their executable counterpart exists
    let script = pkg.hooks_dir.join(format!("{}.trigger", pkg.name));
    if !script.is_file() {
        return Err(MetadataError::MissingTriggerScript(script));
    }

    Ok((resolve_script(&script), pkg.triggers.clone()))
}

/// Canonicalize a script path, keeping the original on failure
fn resolve_script(script: &Path) -> PathBuf {
    script
        .canonicalize()
        .unwrap_or_else(|_| script.to_path_buf())
}
