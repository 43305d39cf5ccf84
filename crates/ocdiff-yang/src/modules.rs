//! Reading modules and resolving their imports and includes

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ocdiff_core::{Extension, ModuleIdent, ModuleInfo, ModuleKind};

use crate::discover::SearchIndex;
use crate::error::Diagnostic;
use crate::statement::{parse_source, Statement};

/// A module or submodule read from disk.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub info: Arc<ModuleInfo>,
    pub statement: Statement,
    pub file: PathBuf,
}

impl ParsedModule {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_submodule(&self) -> bool {
        self.info.kind == ModuleKind::Submodule
    }
}

enum Pending {
    File(PathBuf),
    Name { name: String, from: PathBuf, line: usize },
}

/// Every module and submodule reachable from a set of files.
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    units: BTreeMap<String, ParsedModule>,
}

impl ModuleSet {
    /// Read `files`, then pull in everything they import, include or belong to.
    ///
    /// Problems are appended to `diagnostics`; the set holds whatever loaded.
    pub fn load(files: &[PathBuf], index: &SearchIndex, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut raw: BTreeMap<String, (Statement, PathBuf)> = BTreeMap::new();
        let mut queue: VecDeque<Pending> = files.iter().cloned().map(Pending::File).collect();

        while let Some(pending) = queue.pop_front() {
            let path = match pending {
                Pending::File(path) => path,
                Pending::Name { name, from, line } => {
                    if raw.contains_key(&name) {
                        continue;
                    }
                    match index.lookup(&name) {
                        Some(path) => path.to_path_buf(),
                        None => {
                            diagnostics.push(Diagnostic::new(
                                from,
                                line,
                                format!("no such module: {}", name),
                            ));
                            continue;
                        }
                    }
                }
            };

            let Some(stmt) = read_unit(&path, diagnostics) else {
                continue;
            };
            let name = stmt.arg().to_string();
            if raw.contains_key(&name) {
                tracing::debug!("Module {} already loaded; ignoring {}", name, path.display());
                continue;
            }

            for dep in &stmt.substatements {
                if matches!(dep.keyword.as_str(), "import" | "include" | "belongs-to") {
                    queue.push_back(Pending::Name {
                        name: dep.arg().to_string(),
                        from: path.clone(),
                        line: dep.line,
                    });
                }
            }
            tracing::debug!("Loaded {} {} from {}", stmt.keyword, name, path.display());
            raw.insert(name, (stmt, path));
        }

        let mut units = BTreeMap::new();
        for (name, (stmt, file)) in &raw {
            let info = module_info(stmt, file, &raw, diagnostics);
            units.insert(
                name.clone(),
                ParsedModule {
                    info: Arc::new(info),
                    statement: stmt.clone(),
                    file: file.clone(),
                },
            );
        }
        ModuleSet { units }
    }

    pub fn get(&self, name: &str) -> Option<&ParsedModule> {
        self.units.get(name)
    }

    pub fn units(&self) -> impl Iterator<Item = &ParsedModule> {
        self.units.values()
    }

    /// Top-level modules only.
    pub fn modules(&self) -> impl Iterator<Item = &ParsedModule> {
        self.units.values().filter(|u| !u.is_submodule())
    }

    /// Submodules whose `belongs-to` names `module`.
    pub fn submodules_of<'s>(&'s self, module: &'s str) -> impl Iterator<Item = &'s ParsedModule> + 's {
        self.units
            .values()
            .filter(move |u| u.is_submodule() && u.info.belonging_module() == module)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Parse `path`, which must hold exactly one `module` or `submodule` statement.
fn read_unit(path: &Path, diagnostics: &mut Vec<Diagnostic>) -> Option<Statement> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            diagnostics.push(Diagnostic::new(path, 0, format!("cannot read file: {}", e)));
            return None;
        }
    };

    let mut statements = match parse_source(&source) {
        Ok(statements) => statements,
        Err(e) => {
            diagnostics.push(Diagnostic::new(path, e.line(), e.to_string()));
            return None;
        }
    };

    if statements.len() != 1 {
        diagnostics.push(Diagnostic::new(
            path,
            0,
            format!("expected one module or submodule statement, found {}", statements.len()),
        ));
        return None;
    }
    let stmt = statements.remove(0);
    if !matches!(stmt.keyword.as_str(), "module" | "submodule") || stmt.argument.is_none() {
        diagnostics.push(Diagnostic::new(
            path,
            stmt.line,
            format!("expected a named module or submodule, found {:?}", stmt.keyword),
        ));
        return None;
    }
    Some(stmt)
}

fn prefix_of(stmt: &Statement) -> Option<&str> {
    stmt.find("prefix").map(Statement::arg)
}

fn module_info(
    stmt: &Statement,
    file: &Path,
    raw: &BTreeMap<String, (Statement, PathBuf)>,
    diagnostics: &mut Vec<Diagnostic>,
) -> ModuleInfo {
    let name = stmt.arg().to_string();
    let (kind, belongs_to, prefix) = if stmt.keyword == "submodule" {
        let belongs = stmt.find("belongs-to");
        (
            ModuleKind::Submodule,
            belongs.map(|b| b.arg().to_string()),
            belongs.and_then(prefix_of),
        )
    } else {
        (ModuleKind::Module, None, prefix_of(stmt))
    };
    let prefix = match prefix {
        Some(p) => p.to_string(),
        None => {
            diagnostics.push(Diagnostic::new(file, stmt.line, format!("{} {} has no prefix", stmt.keyword, name)));
            String::new()
        }
    };

    let mut imports = BTreeMap::new();
    for import in stmt.all("import") {
        let Some(import_prefix) = prefix_of(import) else {
            diagnostics.push(Diagnostic::new(file, import.line, format!("import {} has no prefix", import.arg())));
            continue;
        };
        let imported = import.arg();
        let belongs_to = raw
            .get(imported)
            .filter(|(s, _)| s.keyword == "submodule")
            .and_then(|(s, _)| s.find("belongs-to"))
            .map(|b| b.arg().to_string());
        imports.insert(
            import_prefix.to_string(),
            ModuleIdent {
                name: imported.to_string(),
                belongs_to,
            },
        );
    }

    let extensions = stmt
        .substatements
        .iter()
        .filter(|s| s.keyword.contains(':'))
        .map(|s| Extension::new(s.keyword.clone(), s.argument.as_deref()))
        .collect();

    ModuleInfo {
        name,
        kind,
        belongs_to,
        prefix,
        imports,
        extensions,
    }
}
