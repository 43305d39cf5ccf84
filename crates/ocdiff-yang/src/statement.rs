//! Generic YANG statement tree

use crate::error::SyntaxError;
use crate::lexer::{Spanned, Token};

/// `keyword [argument] (';' | '{' substatements '}')`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub keyword: String,
    pub argument: Option<String>,
    pub substatements: Vec<Statement>,
    pub line: usize,
}

impl Statement {
    pub fn new(keyword: impl Into<String>, line: usize) -> Self {
        Statement {
            keyword: keyword.into(),
            argument: None,
            substatements: Vec::new(),
            line,
        }
    }

    /// Argument text, empty when absent.
    pub fn arg(&self) -> &str {
        self.argument.as_deref().unwrap_or_default()
    }

    /// First substatement with `keyword`.
    pub fn find(&self, keyword: &str) -> Option<&Statement> {
        self.substatements.iter().find(|s| s.keyword == keyword)
    }

    /// Every substatement with `keyword`, in order.
    pub fn all<'s>(&'s self, keyword: &'s str) -> impl Iterator<Item = &'s Statement> + 's {
        self.substatements.iter().filter(move |s| s.keyword == keyword)
    }
}

/// Assemble tokens into top-level statements.
pub fn parse_statements(tokens: &[Spanned]) -> Result<Vec<Statement>, SyntaxError> {
    let mut roots: Vec<Statement> = Vec::new();
    let mut open: Vec<Statement> = Vec::new();
    let mut iter = tokens.iter().peekable();

    while let Some(spanned) = iter.next() {
        match &spanned.token {
            Token::CloseBrace => {
                let Some(done) = open.pop() else {
                    return Err(SyntaxError::Unexpected {
                        found: spanned.token.to_string(),
                        line: spanned.line,
                    });
                };
                match open.last_mut() {
                    Some(parent) => parent.substatements.push(done),
                    None => roots.push(done),
                }
            }
            Token::Unquoted(keyword) => {
                let mut stmt = Statement::new(keyword.clone(), spanned.line);
                if let Some(arg) = iter.next_if(|t| matches!(t.token, Token::Unquoted(_) | Token::Quoted(_))) {
                    if let Token::Unquoted(text) | Token::Quoted(text) = &arg.token {
                        stmt.argument = Some(text.clone());
                    }
                }
                match iter.next().map(|t| &t.token) {
                    Some(Token::Semicolon) => match open.last_mut() {
                        Some(parent) => parent.substatements.push(stmt),
                        None => roots.push(stmt),
                    },
                    Some(Token::OpenBrace) => open.push(stmt),
                    _ => {
                        return Err(SyntaxError::MissingTerminator {
                            keyword: stmt.keyword,
                            line: stmt.line,
                        });
                    }
                }
            }
            other => {
                return Err(SyntaxError::Unexpected {
                    found: other.to_string(),
                    line: spanned.line,
                });
            }
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(SyntaxError::Unclosed {
            keyword: unclosed.keyword,
            line: unclosed.line,
        });
    }
    Ok(roots)
}

/// Tokenize and parse `source` in one step.
pub fn parse_source(source: &str) -> Result<Vec<Statement>, SyntaxError> {
    let tokens = crate::lexer::tokenize(source)?;
    parse_statements(&tokens)
}
