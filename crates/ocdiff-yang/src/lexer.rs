//! Tokenizer for YANG source text

use std::fmt;

use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Unquoted(String),
    /// Quoted string after escape processing and `+` concatenation.
    Quoted(String),
    OpenBrace,
    CloseBrace,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Unquoted(s) => write!(f, "{:?}", s),
            Token::Quoted(s) => write!(f, "string {:?}", s),
            Token::OpenBrace => f.write_str("'{'"),
            Token::CloseBrace => f.write_str("'}'"),
            Token::Semicolon => f.write_str("';'"),
        }
    }
}

/// A token and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn at_comment(&self) -> bool {
        self.peek() == Some('/') && matches!(self.peek_at(1), Some('/') | Some('*'))
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.line;
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            None => return Err(SyntaxError::UnterminatedComment { line: start }),
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn quoted(&mut self) -> Result<String, SyntaxError> {
        let start = self.line;
        let Some(quote) = self.bump() else {
            return Err(SyntaxError::UnterminatedString { line: start });
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SyntaxError::UnterminatedString { line: start }),
                Some(c) if c == quote => return Ok(out),
                Some('\\') if quote == '"' => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(SyntaxError::UnterminatedString { line: start }),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn unquoted(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, ';' | '{' | '}') || self.at_comment() {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let line = self.line;
            let Some(c) = self.peek() else {
                break;
            };
            let token = match c {
                '{' => {
                    self.bump();
                    Token::OpenBrace
                }
                '}' => {
                    self.bump();
                    Token::CloseBrace
                }
                ';' => {
                    self.bump();
                    Token::Semicolon
                }
                '"' | '\'' => {
                    let mut text = self.quoted()?;
                    loop {
                        self.skip_trivia()?;
                        if self.peek() != Some('+') {
                            break;
                        }
                        self.bump();
                        self.skip_trivia()?;
                        if !matches!(self.peek(), Some('"') | Some('\'')) {
                            return Err(SyntaxError::DanglingConcat { line: self.line });
                        }
                        text.push_str(&self.quoted()?);
                    }
                    Token::Quoted(text)
                }
                _ => Token::Unquoted(self.unquoted()),
            };
            tokens.push(Spanned { token, line });
        }
        Ok(tokens)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, SyntaxError> {
    Lexer::new(source).tokenize()
}
