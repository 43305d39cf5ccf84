//! Schema tree construction: groupings, typedefs, choices and augments

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ocdiff_core::{EntryKind, EntryNode, ModuleEntries, TypeKind, YangType};

use crate::error::Diagnostic;
use crate::modules::{ModuleSet, ParsedModule};
use crate::statement::Statement;

/// Deepest schema nesting built before reporting an error.
pub const MAX_SCHEMA_DEPTH: usize = 256;

/// Longest typedef chain followed before reporting an error.
pub const MAX_TYPEDEF_CHAIN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefKind {
    Grouping,
    Typedef,
}

/// Lexical scope: the definitions visible from a statement body.
struct Scope<'s> {
    parent: Option<&'s Scope<'s>>,
    unit: &'s ParsedModule,
    groupings: Vec<&'s Statement>,
    typedefs: Vec<&'s Statement>,
}

impl<'s> Scope<'s> {
    /// Module level; its definitions come from the module's top-level table.
    fn root(unit: &'s ParsedModule) -> Self {
        Scope {
            parent: None,
            unit,
            groupings: Vec::new(),
            typedefs: Vec::new(),
        }
    }

    fn child(parent: &'s Scope<'s>, body: &'s Statement) -> Self {
        Scope {
            parent: Some(parent),
            unit: parent.unit,
            groupings: body.all("grouping").collect(),
            typedefs: body.all("typedef").collect(),
        }
    }

    fn local(&self, kind: DefKind, name: &str) -> Option<&'s Statement> {
        let defs = match kind {
            DefKind::Grouping => &self.groupings,
            DefKind::Typedef => &self.typedefs,
        };
        defs.iter().copied().find(|d| d.arg() == name)
    }
}

/// Where a grouping or typedef was found.
struct Found<'s> {
    stmt: &'s Statement,
    /// Enclosing scope for nested definitions, `None` for module-level ones.
    scope: Option<&'s Scope<'s>>,
    unit: &'s ParsedModule,
}

/// Module-level definitions of a module and all of its submodules.
#[derive(Default)]
struct TopLevel<'a> {
    groupings: HashMap<&'a str, (&'a Statement, &'a ParsedModule)>,
    typedefs: HashMap<&'a str, (&'a Statement, &'a ParsedModule)>,
}

impl<'a> TopLevel<'a> {
    fn get(&self, kind: DefKind, name: &str) -> Option<(&'a Statement, &'a ParsedModule)> {
        match kind {
            DefKind::Grouping => self.groupings.get(name).copied(),
            DefKind::Typedef => self.typedefs.get(name).copied(),
        }
    }
}

fn split_prefix(qualified: &str) -> (Option<&str>, &str) {
    match qualified.split_once(':') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, qualified),
    }
}

fn schema_kind(keyword: &str) -> Option<EntryKind> {
    let kind = match keyword {
        "container" => EntryKind::Container,
        "list" => EntryKind::List,
        "leaf" => EntryKind::Leaf,
        "leaf-list" => EntryKind::LeafList,
        "choice" => EntryKind::Choice,
        "case" => EntryKind::Case,
        "anydata" => EntryKind::AnyData,
        "anyxml" => EntryKind::AnyXml,
        "rpc" => EntryKind::Rpc,
        "action" => EntryKind::Action,
        "input" => EntryKind::Input,
        "output" => EntryKind::Output,
        "notification" => EntryKind::Notification,
        _ => return None,
    };
    Some(kind)
}

/// Follow a schema node path (`a/b`, `/p:a/p:b`) down from `nodes`.
fn find_target<'n>(nodes: &'n mut [EntryNode], path: &str) -> Option<&'n mut EntryNode> {
    let mut segments = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| split_prefix(s).1);
    let first = segments.next()?;
    let mut node = nodes.iter_mut().find(|n| n.name == first)?;
    for segment in segments {
        node = node.child_mut(segment)?;
    }
    Some(node)
}

#[derive(Default)]
struct BuildState {
    diagnostics: Vec<Diagnostic>,
    /// Groupings being expanded, as (defining unit, line, name).
    expanding: Vec<(String, usize, String)>,
}

impl BuildState {
    fn error(&mut self, unit: &ParsedModule, line: usize, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(unit.file.clone(), line, message));
    }
}

struct Builder<'a> {
    tops: BTreeMap<&'a str, TopLevel<'a>>,
}

impl<'a> Builder<'a> {
    fn new(set: &'a ModuleSet) -> Self {
        let mut tops: BTreeMap<&'a str, TopLevel<'a>> = BTreeMap::new();
        for unit in set.units() {
            let top = tops.entry(unit.info.belonging_module()).or_default();
            for def in &unit.statement.substatements {
                let table = match def.keyword.as_str() {
                    "grouping" => &mut top.groupings,
                    "typedef" => &mut top.typedefs,
                    _ => continue,
                };
                table.entry(def.arg()).or_insert((def, unit));
            }
        }
        Builder { tops }
    }

    fn top_level(&self, module: &str, kind: DefKind, name: &str) -> Option<(&'a Statement, &'a ParsedModule)> {
        self.tops.get(module)?.get(kind, name)
    }

    /// Resolve a possibly prefixed grouping or typedef name as seen from `scope`.
    fn lookup<'s>(&self, scope: &'s Scope<'s>, kind: DefKind, qualified: &str) -> Option<Found<'s>>
    where
        'a: 's,
    {
        let (prefix, name) = split_prefix(qualified);
        let own_module = scope.unit.info.belonging_module();

        if let Some(prefix) = prefix {
            let ident = scope.unit.info.find_module_by_prefix(prefix)?;
            if ident.belonging_module() != own_module {
                let (stmt, unit) = self.top_level(ident.belonging_module(), kind, name)?;
                return Some(Found { stmt, scope: None, unit });
            }
        }

        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(stmt) = s.local(kind, name) {
                return Some(Found {
                    stmt,
                    scope: Some(s),
                    unit: s.unit,
                });
            }
            current = s.parent;
        }

        let (stmt, unit) = self.top_level(own_module, kind, name)?;
        Some(Found { stmt, scope: None, unit })
    }

    /// Build every schema node defined directly in `parent` into `out`.
    fn build_children(
        &self,
        parent: &Statement,
        scope: &Scope<'_>,
        state: &mut BuildState,
        out: &mut Vec<EntryNode>,
        depth: usize,
        in_choice: bool,
    ) {
        if depth > MAX_SCHEMA_DEPTH {
            state.error(
                scope.unit,
                parent.line,
                format!("schema nesting exceeds {} levels", MAX_SCHEMA_DEPTH),
            );
            return;
        }

        for stmt in &parent.substatements {
            if stmt.keyword == "uses" {
                self.expand_uses(stmt, scope, state, out, depth);
                continue;
            }
            let Some(kind) = schema_kind(&stmt.keyword) else {
                continue;
            };
            let Some(node) = self.build_node(stmt, kind, scope, state, depth) else {
                continue;
            };
            if in_choice && kind != EntryKind::Case {
                // Shorthand case: an implicit case named after the node.
                let case = EntryNode::new(node.name.clone(), EntryKind::Case, Arc::clone(&scope.unit.info));
                out.push(case.with_child(node));
            } else {
                out.push(node);
            }
        }
    }

    fn build_node(
        &self,
        stmt: &Statement,
        kind: EntryKind,
        scope: &Scope<'_>,
        state: &mut BuildState,
        depth: usize,
    ) -> Option<EntryNode> {
        let name = match kind {
            EntryKind::Input | EntryKind::Output => stmt.keyword.clone(),
            _ => match &stmt.argument {
                Some(name) => name.clone(),
                None => {
                    state.error(scope.unit, stmt.line, format!("{} statement has no name", stmt.keyword));
                    return None;
                }
            },
        };
        let mut node = EntryNode::new(name, kind, Arc::clone(&scope.unit.info));

        match kind {
            EntryKind::Leaf | EntryKind::LeafList => match stmt.find("type") {
                Some(type_stmt) => node.yang_type = self.resolve_type(type_stmt, scope, state, 0),
                None => state.error(scope.unit, stmt.line, format!("{} {} has no type", stmt.keyword, node.name)),
            },
            EntryKind::AnyData | EntryKind::AnyXml => {}
            _ => {
                let body = Scope::child(scope, stmt);
                self.build_children(
                    stmt,
                    &body,
                    state,
                    &mut node.children,
                    depth + 1,
                    kind == EntryKind::Choice,
                );
            }
        }
        Some(node)
    }

    fn expand_uses(
        &self,
        uses: &Statement,
        scope: &Scope<'_>,
        state: &mut BuildState,
        out: &mut Vec<EntryNode>,
        depth: usize,
    ) {
        let Some(found) = self.lookup(scope, DefKind::Grouping, uses.arg()) else {
            state.error(scope.unit, uses.line, format!("grouping {} not found", uses.arg()));
            return;
        };

        let key = (found.unit.name().to_string(), found.stmt.line, found.stmt.arg().to_string());
        if state.expanding.contains(&key) {
            state.error(scope.unit, uses.line, format!("grouping {} used recursively", uses.arg()));
            return;
        }
        state.expanding.push(key);

        let root;
        let parent = match found.scope {
            Some(s) => s,
            None => {
                root = Scope::root(found.unit);
                &root
            }
        };
        let body = Scope::child(parent, found.stmt);
        let start = out.len();
        self.build_children(found.stmt, &body, state, out, depth, false);
        state.expanding.pop();

        for augment in uses.all("augment") {
            let Some(target) = find_target(&mut out[start..], augment.arg()) else {
                state.error(
                    scope.unit,
                    augment.line,
                    format!("augment target {} not found in grouping {}", augment.arg(), uses.arg()),
                );
                continue;
            };
            let in_choice = target.kind == EntryKind::Choice;
            let augment_scope = Scope::child(scope, augment);
            self.build_children(augment, &augment_scope, state, &mut target.children, depth + 1, in_choice);
        }
    }

    /// Resolve a `type` statement to its built-in kind, following typedefs.
    fn resolve_type(
        &self,
        type_stmt: &Statement,
        scope: &Scope<'_>,
        state: &mut BuildState,
        chain: usize,
    ) -> Option<YangType> {
        let name = type_stmt.arg();
        if let Some(kind) = TypeKind::from_builtin(name) {
            return Some(YangType::new(name, kind));
        }
        if chain >= MAX_TYPEDEF_CHAIN {
            state.error(
                scope.unit,
                type_stmt.line,
                format!("typedef chain for {} exceeds {} levels", name, MAX_TYPEDEF_CHAIN),
            );
            return None;
        }

        let Some(found) = self.lookup(scope, DefKind::Typedef, name) else {
            state.error(scope.unit, type_stmt.line, format!("unknown type {}", name));
            return None;
        };
        let Some(base) = found.stmt.find("type") else {
            state.error(found.unit, found.stmt.line, format!("typedef {} has no type", found.stmt.arg()));
            return None;
        };

        let root;
        let typedef_scope = match found.scope {
            Some(s) => s,
            None => {
                root = Scope::root(found.unit);
                &root
            }
        };
        let resolved = self.resolve_type(base, typedef_scope, state, chain + 1)?;
        Some(YangType::new(name, resolved.kind))
    }

    /// Apply module-level augments, repeating while any new target resolves.
    fn apply_augments(&self, set: &ModuleSet, trees: &mut BTreeMap<String, EntryNode>, state: &mut BuildState) {
        let mut pending: Vec<(&ParsedModule, &Statement)> = set
            .units()
            .flat_map(|unit| unit.statement.all("augment").map(move |aug| (unit, aug)))
            .collect();

        loop {
            let before = pending.len();
            pending.retain(|(unit, augment)| !self.try_augment(unit, augment, trees, state));
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        for (unit, augment) in pending {
            state.error(unit, augment.line, format!("augment target {} not found", augment.arg()));
        }
    }

    fn try_augment(
        &self,
        unit: &ParsedModule,
        augment: &Statement,
        trees: &mut BTreeMap<String, EntryNode>,
        state: &mut BuildState,
    ) -> bool {
        let target_path = augment.arg();
        let Some(first) = target_path.split('/').find(|s| !s.is_empty()) else {
            return false;
        };
        let target_module = match split_prefix(first).0 {
            Some(prefix) => match unit.info.find_module_by_prefix(prefix) {
                Some(ident) => ident.belonging_module().to_string(),
                None => return false,
            },
            None => unit.info.belonging_module().to_string(),
        };
        let Some(tree) = trees.get_mut(&target_module) else {
            return false;
        };
        let Some(target) = find_target(&mut tree.children, target_path) else {
            return false;
        };

        let in_choice = target.kind == EntryKind::Choice;
        let root = Scope::root(unit);
        let body = Scope::child(&root, augment);
        self.build_children(augment, &body, state, &mut target.children, 1, in_choice);
        tracing::trace!("Applied augment {} from {}", target_path, unit.name());
        true
    }
}

/// Build one entry tree per module in `set`, submodule content included.
pub fn build_entries(set: &ModuleSet) -> Result<ModuleEntries, Vec<Diagnostic>> {
    let builder = Builder::new(set);
    let mut state = BuildState::default();
    let mut trees: BTreeMap<String, EntryNode> = BTreeMap::new();

    for module in set.modules() {
        let mut root = EntryNode::new(module.name(), EntryKind::Module, Arc::clone(&module.info));
        let scope = Scope::root(module);
        builder.build_children(&module.statement, &scope, &mut state, &mut root.children, 1, false);

        for sub in set.submodules_of(module.name()) {
            let sub_scope = Scope::root(sub);
            builder.build_children(&sub.statement, &sub_scope, &mut state, &mut root.children, 1, false);
        }
        trees.insert(module.name().to_string(), root);
    }

    builder.apply_augments(set, &mut trees, &mut state);

    if !state.diagnostics.is_empty() {
        return Err(state.diagnostics);
    }
    Ok(trees
        .into_iter()
        .map(|(name, root)| (name, root.freeze()))
        .collect())
}
