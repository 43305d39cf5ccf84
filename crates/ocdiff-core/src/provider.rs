//! Seam between the differ and whatever parses the schema language

use std::path::PathBuf;

use crate::error::ProviderError;
use crate::model::ModuleEntries;

/// Parses a set of schema files into one entry tree per module or submodule.
///
/// Any diagnostic is a hard failure; implementations return all of them at
/// once rather than stopping at the first.
pub trait EntryProvider {
    fn parse(
        &self,
        files: &[PathBuf],
        search_paths: &[PathBuf],
    ) -> Result<ModuleEntries, ProviderError>;
}

impl<P: EntryProvider + ?Sized> EntryProvider for &P {
    fn parse(
        &self,
        files: &[PathBuf],
        search_paths: &[PathBuf],
    ) -> Result<ModuleEntries, ProviderError> {
        (**self).parse(files, search_paths)
    }
}
