//! Schema entry model shared by providers and the differ

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Whether a parsed unit is a module or a submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Module,
    Submodule,
}

/// Lightweight identity of a module as seen through a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdent {
    pub name: String,
    /// Parent module name when the identified unit is a submodule.
    pub belongs_to: Option<String>,
}

impl ModuleIdent {
    pub fn module(name: impl Into<String>) -> Self {
        ModuleIdent {
            name: name.into(),
            belongs_to: None,
        }
    }

    /// The module itself, or the parent module for a submodule.
    pub fn belonging_module(&self) -> &str {
        self.belongs_to.as_deref().unwrap_or(&self.name)
    }
}

/// An extension statement attached to a module, e.g. `oc-ext:openconfig-version "1.2.0";`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub keyword: String,
    pub argument: Option<String>,
}

impl Extension {
    pub fn new(keyword: impl Into<String>, argument: Option<&str>) -> Self {
        Extension {
            keyword: keyword.into(),
            argument: argument.map(str::to_owned),
        }
    }
}

/// Module-level information for the module or submodule that defines an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: String,
    pub kind: ModuleKind,
    pub belongs_to: Option<String>,
    /// The module's own prefix (the `belongs-to` prefix for a submodule).
    pub prefix: String,
    /// Import prefixes in scope of this module.
    pub imports: BTreeMap<String, ModuleIdent>,
    pub extensions: Vec<Extension>,
}

impl ModuleInfo {
    /// The module itself, or the parent module for a submodule.
    pub fn belonging_module(&self) -> &str {
        match self.kind {
            ModuleKind::Submodule => self.belongs_to.as_deref().unwrap_or(&self.name),
            ModuleKind::Module => &self.name,
        }
    }

    pub fn ident(&self) -> ModuleIdent {
        ModuleIdent {
            name: self.name.clone(),
            belongs_to: match self.kind {
                ModuleKind::Submodule => self.belongs_to.clone(),
                ModuleKind::Module => None,
            },
        }
    }

    /// Resolve a prefix used inside this module to the module that owns it.
    pub fn find_module_by_prefix(&self, prefix: &str) -> Option<ModuleIdent> {
        if prefix == self.prefix {
            return Some(self.ident());
        }
        self.imports.get(prefix).cloned()
    }
}

/// Schema node kinds produced by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    Module,
    Submodule,
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
    AnyData,
    AnyXml,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
}

impl EntryKind {
    /// Coarse structural class used when comparing untyped entries.
    pub fn class(self) -> NodeClass {
        match self {
            EntryKind::Leaf | EntryKind::LeafList => NodeClass::Leaf,
            EntryKind::Module
            | EntryKind::Submodule
            | EntryKind::Container
            | EntryKind::List
            | EntryKind::Rpc
            | EntryKind::Action => NodeClass::Directory,
            EntryKind::Choice => NodeClass::Choice,
            EntryKind::Case => NodeClass::Case,
            EntryKind::AnyData => NodeClass::AnyData,
            EntryKind::AnyXml => NodeClass::AnyXml,
            EntryKind::Input => NodeClass::Input,
            EntryKind::Output => NodeClass::Output,
            EntryKind::Notification => NodeClass::Notification,
        }
    }

    pub fn is_module(self) -> bool {
        matches!(self, EntryKind::Module | EntryKind::Submodule)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryKind::Module => "module",
            EntryKind::Submodule => "submodule",
            EntryKind::Container => "container",
            EntryKind::List => "list",
            EntryKind::Leaf => "leaf",
            EntryKind::LeafList => "leaf-list",
            EntryKind::Choice => "choice",
            EntryKind::Case => "case",
            EntryKind::AnyData => "anydata",
            EntryKind::AnyXml => "anyxml",
            EntryKind::Rpc => "rpc",
            EntryKind::Action => "action",
            EntryKind::Input => "input",
            EntryKind::Output => "output",
            EntryKind::Notification => "notification",
        };
        f.write_str(s)
    }
}

/// Structural class of an entry. Containers and lists share `Directory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Leaf,
    Directory,
    AnyData,
    AnyXml,
    Choice,
    Case,
    Input,
    Output,
    Notification,
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeClass::Leaf => "Leaf",
            NodeClass::Directory => "Directory",
            NodeClass::AnyData => "AnyData",
            NodeClass::AnyXml => "AnyXML",
            NodeClass::Choice => "Choice",
            NodeClass::Case => "Case",
            NodeClass::Input => "Input",
            NodeClass::Output => "Output",
            NodeClass::Notification => "Notification",
        };
        f.write_str(s)
    }
}

/// Built-in YANG type a leaf ultimately resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Binary,
    Bits,
    Bool,
    Decimal64,
    Empty,
    Enum,
    Identityref,
    InstanceIdentifier,
    Leafref,
    String,
    Union,
}

impl TypeKind {
    /// Map a built-in type name to its kind.
    pub fn from_builtin(name: &str) -> Option<Self> {
        let kind = match name {
            "int8" => TypeKind::Int8,
            "int16" => TypeKind::Int16,
            "int32" => TypeKind::Int32,
            "int64" => TypeKind::Int64,
            "uint8" => TypeKind::Uint8,
            "uint16" => TypeKind::Uint16,
            "uint32" => TypeKind::Uint32,
            "uint64" => TypeKind::Uint64,
            "binary" => TypeKind::Binary,
            "bits" => TypeKind::Bits,
            "boolean" => TypeKind::Bool,
            "decimal64" => TypeKind::Decimal64,
            "empty" => TypeKind::Empty,
            "enumeration" => TypeKind::Enum,
            "identityref" => TypeKind::Identityref,
            "instance-identifier" => TypeKind::InstanceIdentifier,
            "leafref" => TypeKind::Leafref,
            "string" => TypeKind::String,
            "union" => TypeKind::Union,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Int8 => "Yint8",
            TypeKind::Int16 => "Yint16",
            TypeKind::Int32 => "Yint32",
            TypeKind::Int64 => "Yint64",
            TypeKind::Uint8 => "Yuint8",
            TypeKind::Uint16 => "Yuint16",
            TypeKind::Uint32 => "Yuint32",
            TypeKind::Uint64 => "Yuint64",
            TypeKind::Binary => "Ybinary",
            TypeKind::Bits => "Ybits",
            TypeKind::Bool => "Ybool",
            TypeKind::Decimal64 => "Ydecimal64",
            TypeKind::Empty => "Yempty",
            TypeKind::Enum => "Yenum",
            TypeKind::Identityref => "Yidentityref",
            TypeKind::InstanceIdentifier => "YinstanceIdentifier",
            TypeKind::Leafref => "Yleafref",
            TypeKind::String => "Ystring",
            TypeKind::Union => "Yunion",
        };
        f.write_str(s)
    }
}

/// Type descriptor of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YangType {
    /// Type name as written, possibly a prefixed typedef name.
    pub name: String,
    pub kind: TypeKind,
}

impl YangType {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        YangType {
            name: name.into(),
            kind,
        }
    }
}

/// A single node in a parsed schema tree.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub yang_type: Option<YangType>,
    /// The module or submodule whose statements define this node.
    pub module: Arc<ModuleInfo>,
    pub children: Vec<Arc<Entry>>,
}

impl Entry {
    pub fn is_leaf(&self) -> bool {
        self.kind == EntryKind::Leaf
    }

    pub fn is_leaf_list(&self) -> bool {
        self.kind == EntryKind::LeafList
    }

    /// The type kind for typed entries, the structural class otherwise.
    pub fn kind_descriptor(&self) -> String {
        match &self.yang_type {
            Some(t) => t.kind.to_string(),
            None => self.kind.class().to_string(),
        }
    }

    /// Name of the module owning this entry, resolving submodules to their parent.
    pub fn owning_module(&self) -> &str {
        self.module.belonging_module()
    }

    pub fn child(&self, name: &str) -> Option<&Arc<Entry>> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Mutable node used while assembling a schema tree, frozen into [`Entry`].
#[derive(Debug, Clone)]
pub struct EntryNode {
    pub name: String,
    pub kind: EntryKind,
    pub yang_type: Option<YangType>,
    pub module: Arc<ModuleInfo>,
    pub children: Vec<EntryNode>,
}

impl EntryNode {
    pub fn new(name: impl Into<String>, kind: EntryKind, module: Arc<ModuleInfo>) -> Self {
        EntryNode {
            name: name.into(),
            kind,
            yang_type: None,
            module,
            children: Vec::new(),
        }
    }

    pub fn with_type(mut self, yang_type: YangType) -> Self {
        self.yang_type = Some(yang_type);
        self
    }

    pub fn with_child(mut self, child: EntryNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut EntryNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Freeze this node as a tree root; paths start at `/<name>`.
    pub fn freeze(self) -> Arc<Entry> {
        self.freeze_under("")
    }

    fn freeze_under(self, parent_path: &str) -> Arc<Entry> {
        let path = format!("{}/{}", parent_path, self.name);
        let children = self
            .children
            .into_iter()
            .map(|c| c.freeze_under(&path))
            .collect();
        Arc::new(Entry {
            name: self.name,
            path,
            kind: self.kind,
            yang_type: self.yang_type,
            module: self.module,
            children,
        })
    }
}

/// Parsed roots keyed by module or submodule name.
pub type ModuleEntries = BTreeMap<String, Arc<Entry>>;
