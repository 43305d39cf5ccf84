//! [`EntryProvider`] backed by the in-crate YANG reader

use std::path::PathBuf;

use ocdiff_core::{EntryProvider, ModuleEntries, ProviderError};

use crate::discover::SearchIndex;
use crate::entry_builder::build_entries;
use crate::error::Diagnostic;
use crate::modules::ModuleSet;

fn provider_error(diagnostics: &[Diagnostic]) -> ProviderError {
    ProviderError::new(diagnostics.iter().map(ToString::to_string).collect())
}

/// Reads `.yang` files from disk, resolving dependencies from the search paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct YangEntryProvider;

impl YangEntryProvider {
    pub fn new() -> Self {
        YangEntryProvider
    }

    /// Load `files` and their dependencies without building entry trees.
    pub fn load(&self, files: &[PathBuf], search_paths: &[PathBuf]) -> Result<ModuleSet, ProviderError> {
        let index = SearchIndex::build(search_paths);
        let mut diagnostics = Vec::new();
        let set = ModuleSet::load(files, &index, &mut diagnostics);
        if !diagnostics.is_empty() {
            return Err(provider_error(&diagnostics));
        }
        Ok(set)
    }
}

impl EntryProvider for YangEntryProvider {
    fn parse(&self, files: &[PathBuf], search_paths: &[PathBuf]) -> Result<ModuleEntries, ProviderError> {
        let set = self.load(files, search_paths)?;
        let entries = build_entries(&set).map_err(|diagnostics| provider_error(&diagnostics))?;
        tracing::debug!(
            "Built {} module trees from {} files ({} units loaded)",
            entries.len(),
            files.len(),
            set.len()
        );
        Ok(entries)
    }
}
