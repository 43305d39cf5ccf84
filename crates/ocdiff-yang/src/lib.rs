//! ocdiff yang: reads YANG modules from disk into ocdiff entry trees

pub mod lexer;
pub mod statement;
pub mod error;
pub mod discover;
pub mod modules;
pub mod entry_builder;
pub mod provider;


pub use error::{Diagnostic, SyntaxError};
pub use discover::{module_name_from_path, yang_files_under, SearchIndex};
pub use modules::{ModuleSet, ParsedModule};
pub use entry_builder::build_entries;
pub use provider::YangEntryProvider;
pub use statement::{parse_source, Statement};
