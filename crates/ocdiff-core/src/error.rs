//! Error types for flattening and version extraction

use thiserror::Error;

/// Failure reported by an [`EntryProvider`](crate::provider::EntryProvider).
#[derive(Debug, Clone, Error)]
#[error("{}", .diagnostics.join("\n"))]
pub struct ProviderError {
    pub diagnostics: Vec<String>,
}

impl ProviderError {
    pub fn new(diagnostics: Vec<String>) -> Self {
        ProviderError { diagnostics }
    }
}

/// Errors that abort a diff.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to parse YANG files:\n{}", .diagnostics.join("\n"))]
    Parse { diagnostics: Vec<String> },

    #[error("entry {path:?} is nested deeper than {max} levels")]
    DepthExceeded { path: String, max: usize },
}

impl From<ProviderError> for DiffError {
    fn from(err: ProviderError) -> Self {
        DiffError::Parse {
            diagnostics: err.diagnostics,
        }
    }
}

/// Why a module has no usable `openconfig-version`.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("cannot convert entry {0:?} to a module")]
    NotAModule(String),

    #[error("did not find openconfig-extensions:openconfig-version statement in module {0:?}")]
    NotFound(String),

    #[error("invalid openconfig-version {version:?} in module {module:?}: {source}")]
    Invalid {
        module: String,
        version: String,
        #[source]
        source: semver::Error,
    },
}
