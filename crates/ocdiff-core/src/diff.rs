//! Correlation of two flattened schemas into added, deleted and updated nodes

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use semver::Version;

use crate::error::DiffError;
use crate::flatten::{flattened_entries, EntryMap, FlattenedSchema, ModuleVersions};
use crate::model::Entry;
use crate::provider::EntryProvider;

/// Version movement of the module owning a changed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub module: String,
    pub old: Option<Version>,
    pub new: Option<Version>,
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_unknown(v: &Option<Version>) -> String {
            v.as_ref()
                .map_or_else(|| "unknown".to_string(), Version::to_string)
        }
        write!(
            f,
            "{:?}: openconfig-version change {} -> {}",
            self.module,
            or_unknown(&self.old),
            or_unknown(&self.new)
        )
    }
}

/// A node present on only one side.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub path: String,
    pub entry: Arc<Entry>,
    /// Only meaningful for deletions.
    pub allow_incompat: bool,
    pub version_change: VersionChange,
}

/// A node present on both sides whose kind changed.
#[derive(Debug, Clone)]
pub struct NodeUpdateInfo {
    pub path: String,
    pub old_entry: Arc<Entry>,
    pub new_entry: Arc<Entry>,
    pub allow_incompat: bool,
    pub version_change: VersionChange,
    /// Never empty; pairs with nothing to report are not recorded.
    pub incompat_comments: Vec<String>,
}

/// Whether a backward-incompatible change is covered by the version bump.
///
/// Unknown versions are tolerated, as are pre-1.0 modules and major bumps.
pub fn incompat_allowed(old: Option<&Version>, new: Option<&Version>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => old.major == 0 || new.major > old.major,
        _ => true,
    }
}

/// Node-level differences between two sets of YANG modules.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    pub(crate) new_nodes: Vec<NodeInfo>,
    pub(crate) updated_nodes: Vec<NodeUpdateInfo>,
    pub(crate) deleted_nodes: Vec<NodeInfo>,
    pub(crate) old_module_versions: ModuleVersions,
    pub(crate) new_module_versions: ModuleVersions,
}

impl DiffReport {
    /// Parse both sides with `provider` and correlate them.
    pub fn new<P: EntryProvider + ?Sized>(
        provider: &P,
        old_paths: &[PathBuf],
        new_paths: &[PathBuf],
        old_files: &[PathBuf],
        new_files: &[PathBuf],
    ) -> Result<Self, DiffError> {
        let old = flattened_entries(provider, old_paths, old_files)?;
        let new = flattened_entries(provider, new_paths, new_files)?;
        Ok(Self::from_schemas(old, new))
    }

    /// Correlate two already flattened schemas.
    pub fn from_schemas(old: FlattenedSchema, new: FlattenedSchema) -> Self {
        let mut report = DiffReport {
            old_module_versions: old.versions,
            new_module_versions: new.versions,
            ..Default::default()
        };
        report.diff_maps(&old.entries, &new.entries);
        tracing::debug!(
            "Diff: {} added, {} deleted, {} updated",
            report.new_nodes.len(),
            report.deleted_nodes.len(),
            report.updated_nodes.len()
        );
        report
    }

    fn diff_maps(&mut self, old_entries: &EntryMap, new_entries: &EntryMap) {
        for (path, old_entry) in old_entries {
            self.add_pair(Some(old_entry), new_entries.get(path));
        }
        for (path, new_entry) in new_entries {
            if !old_entries.contains_key(path) {
                self.add_pair(None, Some(new_entry));
            }
        }
    }

    fn version_change(&self, entry: &Entry) -> VersionChange {
        let module = entry.owning_module();
        VersionChange {
            module: module.to_string(),
            old: self.old_module_versions.get(module).cloned(),
            new: self.new_module_versions.get(module).cloned(),
        }
    }

    fn add_pair(&mut self, old: Option<&Arc<Entry>>, new: Option<&Arc<Entry>>) {
        match (old, new) {
            (None, None) => {}
            (None, Some(n)) => {
                let version_change = self.version_change(n);
                let allow_incompat =
                    incompat_allowed(version_change.old.as_ref(), version_change.new.as_ref());
                self.new_nodes.push(NodeInfo {
                    path: n.path.clone(),
                    entry: Arc::clone(n),
                    allow_incompat,
                    version_change,
                });
            }
            (Some(o), None) => {
                let version_change = self.version_change(o);
                let allow_incompat =
                    incompat_allowed(version_change.old.as_ref(), version_change.new.as_ref());
                self.deleted_nodes.push(NodeInfo {
                    path: o.path.clone(),
                    entry: Arc::clone(o),
                    allow_incompat,
                    version_change,
                });
            }
            (Some(o), Some(n)) => {
                let mut incompat_comments = Vec::new();
                let (old_kind, new_kind) = (o.kind_descriptor(), n.kind_descriptor());
                if old_kind != new_kind {
                    incompat_comments.push(format!("type changed from {} to {}", old_kind, new_kind));
                }
                if incompat_comments.is_empty() {
                    return;
                }

                // Judged against the module whose version should have been bumped.
                let version_change = self.version_change(o);
                let allow_incompat =
                    incompat_allowed(version_change.old.as_ref(), version_change.new.as_ref());
                self.updated_nodes.push(NodeUpdateInfo {
                    path: o.path.clone(),
                    old_entry: Arc::clone(o),
                    new_entry: Arc::clone(n),
                    allow_incompat,
                    version_change,
                    incompat_comments,
                });
            }
        }
    }

    /// Sort every list by path. Idempotent.
    pub fn sort(&mut self) {
        self.new_nodes.sort_by(|a, b| a.path.cmp(&b.path));
        self.deleted_nodes.sort_by(|a, b| a.path.cmp(&b.path));
        self.updated_nodes.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn new_nodes(&self) -> &[NodeInfo] {
        &self.new_nodes
    }

    pub fn deleted_nodes(&self) -> &[NodeInfo] {
        &self.deleted_nodes
    }

    pub fn updated_nodes(&self) -> &[NodeUpdateInfo] {
        &self.updated_nodes
    }

    pub fn old_module_versions(&self) -> &ModuleVersions {
        &self.old_module_versions
    }

    pub fn new_module_versions(&self) -> &ModuleVersions {
        &self.new_module_versions
    }

    pub fn is_empty(&self) -> bool {
        self.new_nodes.is_empty() && self.deleted_nodes.is_empty() && self.updated_nodes.is_empty()
    }
}
