//! `openconfig-version` extraction from module extension statements

use std::fmt::Write;

use semver::Version;

use crate::error::VersionError;
use crate::model::{Entry, Extension, ModuleInfo};

/// Module that defines the OpenConfig extension keywords.
pub const OPENCONFIG_EXTENSIONS: &str = "openconfig-extensions";

/// Extension carrying a module's semantic version.
pub const OPENCONFIG_VERSION: &str = "openconfig-version";

/// Extensions the differ understands, keyed by defining module and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownExtension {
    OpenconfigVersion,
}

impl KnownExtension {
    const REGISTRY: &'static [(&'static str, &'static str, KnownExtension)] = &[(
        OPENCONFIG_EXTENSIONS,
        OPENCONFIG_VERSION,
        KnownExtension::OpenconfigVersion,
    )];

    fn lookup(defining_module: &str, name: &str) -> Option<Self> {
        Self::REGISTRY
            .iter()
            .find(|(module, ext, _)| *module == defining_module && *ext == name)
            .map(|(_, _, known)| *known)
    }
}

/// Split `prefix:name` into its parts, rejecting anything else.
fn split_keyword(keyword: &str) -> Option<(&str, &str)> {
    let mut parts = keyword.split(':');
    let prefix = parts.next()?;
    let name = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((prefix.trim(), name.trim()))
}

/// Classify an extension statement of `module`. Unrecognized keywords yield `None`.
pub fn classify_extension(module: &ModuleInfo, ext: &Extension) -> Option<KnownExtension> {
    let (prefix, name) = split_keyword(&ext.keyword)?;
    if name != OPENCONFIG_VERSION {
        return None;
    }
    let defining = module.find_module_by_prefix(prefix)?;
    KnownExtension::lookup(defining.belonging_module(), name)
}

/// Extract the strict semantic version a module declares via `openconfig-version`.
///
/// The first matching statement wins. A missing statement or a version that
/// fails strict parsing (`1.2`, `v1.2.3`) is an error; callers treat both as
/// "version unknown".
pub fn module_version(entry: &Entry) -> Result<Version, VersionError> {
    if !entry.kind.is_module() {
        return Err(VersionError::NotAModule(entry.name.clone()));
    }
    let module = &entry.module;

    for ext in &module.extensions {
        if classify_extension(module, ext) != Some(KnownExtension::OpenconfigVersion) {
            continue;
        }
        let argument = ext.argument.as_deref().unwrap_or_default();
        return Version::parse(argument).map_err(|source| VersionError::Invalid {
            module: module.name.clone(),
            version: argument.to_string(),
            source,
        });
    }

    Err(VersionError::NotFound(module.name.clone()))
}

/// List every module and submodule with the raw `openconfig-version` arguments it declares.
///
/// One line per unit in name order: `name.yang:` followed by
/// ` openconfig-version:"<arg>"` for each statement whose prefix resolves to
/// `openconfig-extensions` itself. Submodules resolve prefixes through their
/// own imports.
pub fn module_versions_listing<'a, I>(units: I) -> String
where
    I: IntoIterator<Item = &'a ModuleInfo>,
{
    let mut units: Vec<&ModuleInfo> = units.into_iter().collect();
    units.sort_by(|a, b| a.name.cmp(&b.name));
    units.dedup_by(|a, b| a.name == b.name);

    let mut out = String::new();
    for module in units {
        let _ = write!(out, "{}.yang:", module.name);

        for ext in &module.extensions {
            let Some((prefix, name)) = split_keyword(&ext.keyword) else {
                continue;
            };
            if name != OPENCONFIG_VERSION {
                continue;
            }
            match module.find_module_by_prefix(prefix) {
                None => tracing::warn!(
                    "unable to find module using prefix {:?} from referencing module {:?}",
                    prefix,
                    module.name
                ),
                Some(ident) if ident.name == OPENCONFIG_EXTENSIONS => {
                    let _ = write!(
                        out,
                        " openconfig-version:{:?}",
                        ext.argument.as_deref().unwrap_or_default()
                    );
                }
                Some(_) => {}
            }
        }

        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keyword() {
        assert_eq!(split_keyword("oc-ext:openconfig-version"), Some(("oc-ext", "openconfig-version")));
        assert_eq!(split_keyword(" oc-ext : openconfig-version "), Some(("oc-ext", "openconfig-version")));
        assert_eq!(split_keyword("openconfig-version"), None);
        assert_eq!(split_keyword("a:b:c"), None);
    }
}
