//! ocdiff core: schema entry model, version extraction, flattening and the
//! backward-compatibility differ for OpenConfig YANG modules

pub mod model;
pub mod provider;
pub mod error;
pub mod version;
pub mod flatten;
pub mod diff;
pub mod report;


#[cfg(test)]
pub mod test_utils;

pub use model::{Entry, EntryKind, EntryNode, Extension, ModuleEntries, ModuleIdent, ModuleInfo, ModuleKind, NodeClass, TypeKind, YangType};
pub use provider::EntryProvider;
pub use error::{DiffError, ProviderError, VersionError};
pub use version::{KnownExtension, module_version, module_versions_listing, OPENCONFIG_EXTENSIONS, OPENCONFIG_VERSION};
pub use flatten::{EntryMap, FlattenedSchema, ModuleVersions, flattened_entries, MAX_ENTRY_DEPTH};
pub use diff::{DiffReport, NodeInfo, NodeUpdateInfo, VersionChange, incompat_allowed};
pub use report::{ChangeAction, ChangeRecord, DiffSummary, ReportOptions, ReportStyle};
