//! Syntax errors and provider diagnostics

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Lexing or statement-structure failure within one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unterminated string")]
    UnterminatedString { line: usize },

    #[error("unterminated comment")]
    UnterminatedComment { line: usize },

    #[error("expected a quoted string after '+'")]
    DanglingConcat { line: usize },

    #[error("unexpected {found}")]
    Unexpected { found: String, line: usize },

    #[error("expected ';' or '{{' after {keyword:?}")]
    MissingTerminator { keyword: String, line: usize },

    #[error("missing '}}' for {keyword:?}")]
    Unclosed { keyword: String, line: usize },
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::UnterminatedString { line }
            | SyntaxError::UnterminatedComment { line }
            | SyntaxError::DanglingConcat { line }
            | SyntaxError::Unexpected { line, .. }
            | SyntaxError::MissingTerminator { line, .. }
            | SyntaxError::Unclosed { line, .. } => *line,
        }
    }
}

/// A problem found while loading modules or building their trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: PathBuf,
    /// 1-based; 0 when the problem is not tied to a line.
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}: {}", self.file.display(), self.message)
        } else {
            write!(f, "{}:{}: {}", self.file.display(), self.line, self.message)
        }
    }
}
