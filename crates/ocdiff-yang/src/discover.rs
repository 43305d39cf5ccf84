//! Locating `.yang` files on disk

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Module name a file is expected to hold: the stem up to an optional `@revision`.
pub fn module_name_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = stem.split('@').next().unwrap_or(stem);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn is_yang_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "yang")
}

/// Every `.yang` file below `root`, sorted. Hidden and ignored files are included.
pub fn yang_files_under(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root).standard_filters(false).build();

    let mut files = Vec::new();
    for result in walker {
        match result {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
                if is_file && is_yang_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => tracing::warn!("Skipping unreadable path under {}: {}", root.display(), e),
        }
    }
    files.sort();
    files
}

/// Module name to file, built from the search paths.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    by_name: BTreeMap<String, PathBuf>,
}

impl SearchIndex {
    /// Index every `.yang` file under each search path. The first file found for a name wins.
    pub fn build(search_paths: &[PathBuf]) -> Self {
        let mut index = SearchIndex::default();
        for root in search_paths {
            for file in yang_files_under(root) {
                let Some(name) = module_name_from_path(&file) else {
                    continue;
                };
                if let Some(existing) = index.by_name.get(&name) {
                    tracing::debug!(
                        "Module {} found at {} and {}; using the former",
                        name,
                        existing.display(),
                        file.display()
                    );
                    continue;
                }
                index.by_name.insert(name, file);
            }
        }
        if index.is_empty() && !search_paths.is_empty() {
            tracing::warn!("No YANG files found under {} search paths", search_paths.len());
        }
        tracing::debug!("Indexed {} modules from {} search paths", index.len(), search_paths.len());
        index
    }

    pub fn lookup(&self, module: &str) -> Option<&Path> {
        self.by_name.get(module).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
