//! Fixture builders for entry trees

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ProviderError;
use crate::flatten::{flattened_entries, FlattenedSchema};
use crate::model::*;
use crate::provider::EntryProvider;

/// A module importing `openconfig-extensions` as `oc-ext`, optionally versioned.
pub fn oc_module(name: &str, version: Option<&str>) -> Arc<ModuleInfo> {
    let mut imports = BTreeMap::new();
    imports.insert("oc-ext".to_string(), ModuleIdent::module("openconfig-extensions"));
    let extensions = version
        .map(|v| vec![Extension::new("oc-ext:openconfig-version", Some(v))])
        .unwrap_or_default();
    Arc::new(ModuleInfo {
        name: name.to_string(),
        kind: ModuleKind::Module,
        belongs_to: None,
        prefix: name.to_string(),
        imports,
        extensions,
    })
}

/// A submodule of `parent` carrying its own version statement.
pub fn oc_submodule(name: &str, parent: &str, version: Option<&str>) -> Arc<ModuleInfo> {
    let mut info = (*oc_module(name, version)).clone();
    info.kind = ModuleKind::Submodule;
    info.belongs_to = Some(parent.to_string());
    info.prefix = parent.to_string();
    Arc::new(info)
}

pub fn leaf(module: &Arc<ModuleInfo>, name: &str, kind: TypeKind) -> EntryNode {
    EntryNode::new(name, EntryKind::Leaf, Arc::clone(module)).with_type(YangType::new(format!("{:?}", kind), kind))
}

pub fn leaf_list(module: &Arc<ModuleInfo>, name: &str, kind: TypeKind) -> EntryNode {
    EntryNode::new(name, EntryKind::LeafList, Arc::clone(module)).with_type(YangType::new(format!("{:?}", kind), kind))
}

pub fn container(module: &Arc<ModuleInfo>, name: &str, children: Vec<EntryNode>) -> EntryNode {
    let mut node = EntryNode::new(name, EntryKind::Container, Arc::clone(module));
    node.children = children;
    node
}

pub fn list(module: &Arc<ModuleInfo>, name: &str, children: Vec<EntryNode>) -> EntryNode {
    let mut node = EntryNode::new(name, EntryKind::List, Arc::clone(module));
    node.children = children;
    node
}

/// Freeze a module root holding `children`.
pub fn module_root(module: &Arc<ModuleInfo>, children: Vec<EntryNode>) -> Arc<Entry> {
    let kind = match module.kind {
        ModuleKind::Module => EntryKind::Module,
        ModuleKind::Submodule => EntryKind::Submodule,
    };
    let mut node = EntryNode::new(module.name.clone(), kind, Arc::clone(module));
    node.children = children;
    node.freeze()
}

pub fn entries(roots: Vec<Arc<Entry>>) -> ModuleEntries {
    roots.into_iter().map(|r| (r.name.clone(), r)).collect()
}

/// Provider serving canned module trees keyed by the first requested file.
#[derive(Default)]
pub struct StaticProvider {
    sides: HashMap<PathBuf, Result<ModuleEntries, ProviderError>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(mut self, file: &str, roots: Vec<Arc<Entry>>) -> Self {
        self.sides.insert(PathBuf::from(file), Ok(entries(roots)));
        self
    }

    pub fn side_modules(mut self, file: &str, modules: ModuleEntries) -> Self {
        self.sides.insert(PathBuf::from(file), Ok(modules));
        self
    }

    pub fn failing(mut self, file: &str, diagnostics: &[&str]) -> Self {
        let diagnostics = diagnostics.iter().map(|d| d.to_string()).collect();
        self.sides.insert(PathBuf::from(file), Err(ProviderError::new(diagnostics)));
        self
    }
}

impl EntryProvider for StaticProvider {
    fn parse(&self, files: &[PathBuf], _search_paths: &[PathBuf]) -> Result<ModuleEntries, ProviderError> {
        let key = files.first().map(PathBuf::as_path).unwrap_or(Path::new(""));
        self.sides
            .get(key)
            .cloned()
            .unwrap_or_else(|| Ok(ModuleEntries::new()))
    }
}

/// Flatten `roots` as one side of a diff.
pub fn schema(roots: Vec<Arc<Entry>>) -> FlattenedSchema {
    let provider = StaticProvider::new().side("side.yang", roots);
    flattened_entries(&provider, &[], &[PathBuf::from("side.yang")]).unwrap()
}
