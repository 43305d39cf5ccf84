//! Flattening of entry trees into path-keyed maps

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use semver::Version;

use crate::error::DiffError;
use crate::model::Entry;
use crate::provider::EntryProvider;
use crate::version::module_version;

/// Deepest nesting accepted from a provider before giving up.
pub const MAX_ENTRY_DEPTH: usize = 512;

/// Module name to declared `openconfig-version`.
pub type ModuleVersions = BTreeMap<String, Version>;

/// Path-keyed index of every entry of one side of a diff.
pub type EntryMap = BTreeMap<String, Arc<Entry>>;

/// One side of a diff: every entry by path plus the known module versions.
#[derive(Debug, Clone, Default)]
pub struct FlattenedSchema {
    pub entries: EntryMap,
    pub versions: ModuleVersions,
}

/// Parse `files` with `provider` and flatten every returned module tree.
pub fn flattened_entries<P: EntryProvider + ?Sized>(
    provider: &P,
    search_paths: &[PathBuf],
    files: &[PathBuf],
) -> Result<FlattenedSchema, DiffError> {
    let modules = provider.parse(files, search_paths)?;

    let mut versions = ModuleVersions::new();
    let mut collected = Vec::new();
    for (module_name, root) in &modules {
        flatten_entry(root, &mut collected)?;
        match module_version(root) {
            Ok(version) => {
                versions.insert(module_name.clone(), version);
            }
            Err(e) => tracing::debug!("No usable version for {}: {}", module_name, e),
        }
    }

    let mut entries = EntryMap::new();
    for entry in collected {
        if let Some(previous) = entries.insert(entry.path.clone(), Arc::clone(&entry)) {
            tracing::warn!(
                "Path {} defined by both {:?} and {:?}; keeping the latter",
                entry.path,
                previous.module.name,
                entry.module.name
            );
        }
    }

    tracing::debug!(
        "Flattened {} modules into {} entries ({} versioned)",
        modules.len(),
        entries.len(),
        versions.len()
    );
    Ok(FlattenedSchema { entries, versions })
}

/// Collect `root` and all its descendants, depth-first in declaration order.
pub fn flatten_entry(root: &Arc<Entry>, out: &mut Vec<Arc<Entry>>) -> Result<(), DiffError> {
    let mut stack = vec![(Arc::clone(root), 0usize)];
    while let Some((entry, depth)) = stack.pop() {
        if depth > MAX_ENTRY_DEPTH {
            return Err(DiffError::DepthExceeded {
                path: entry.path.clone(),
                max: MAX_ENTRY_DEPTH,
            });
        }
        for child in entry.children.iter().rev() {
            stack.push((Arc::clone(child), depth + 1));
        }
        out.push(entry);
    }
    Ok(())
}
