//! Lexer for invocation scripts
//!
//! Tokenizes the statement subset understood by [`TeraHost`](super::TeraHost):
//! identifiers, single- or double-quoted string literals and punctuation.
//! Line and block comments are skipped.

use super::EngineError;

/// A token with the byte offset it starts at
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
        }
    }
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String), // ractive, Ractive, JSON
    String(String), // 'decoded text'

    Dot,       // .
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Assign,    // =
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }

    Eof,
}

impl TokenKind {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBrace => "'{'".to_string(),
            TokenKind::RBrace => "'}'".to_string(),
            TokenKind::Eof => "end of script".to_string(),
        }
    }
}

/// Lexer state
pub struct Lexer<'a> {
    source: &'a str,
    /// Current byte position in source
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
        }
    }

    /// Tokenize the whole source. The last token is always [`TokenKind::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, EngineError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Peek at the next character without consuming
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Peek at the next n bytes as a string slice
    fn peek_n(&self, n: usize) -> Option<&str> {
        self.source.get(self.pos..self.pos + n)
    }

    /// Advance by one character and return it
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<(), EngineError> {
        loop {
            match self.peek_n(2) {
                Some("//") => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some("/*") => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek_n(2) {
                            Some("*/") => {
                                self.pos += 2;
                                break;
                            }
                            _ => {
                                if self.advance().is_none() {
                                    return Err(syntax("unterminated comment", start));
                                }
                            }
                        }
                    }
                }
                _ => match self.peek() {
                    Some(c) if c.is_whitespace() => {
                        self.advance();
                    }
                    _ => return Ok(()),
                },
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token, EngineError> {
        self.skip_trivia()?;

        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        let kind = match c {
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '=' => TokenKind::Assign,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '"' | '\'' => return self.lex_string(c),
            c if is_ident_start(c) => return Ok(self.lex_ident()),
            other => return Err(syntax(format!("unexpected character '{other}'"), start)),
        };

        self.advance();
        Ok(Token::new(kind, start))
    }

    /// Lex an identifier
    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Ident(self.source[start..self.pos].to_string()), start)
    }

    /// Lex a string literal, decoding escape sequences
    fn lex_string(&mut self, quote: char) -> Result<Token, EngineError> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n' | '\r') => {
                    return Err(syntax("unterminated string literal", start));
                }
                Some(c) if c == quote => break,
                Some('\\') => self.lex_escape(&mut value)?,
                Some(c) => value.push(c),
            }
        }

        Ok(Token::new(TokenKind::String(value), start))
    }

    /// Decode the escape sequence following a backslash
    fn lex_escape(&mut self, out: &mut String) -> Result<(), EngineError> {
        let at = self.pos - 1;
        match self.advance() {
            None => return Err(syntax("unterminated string literal", at)),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let code = self.lex_hex(2, at)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some('u') => {
                let code = self.lex_hex(4, at)?;
                out.push(self.lex_code_unit(code, at)?);
            }
            // Line continuation
            Some('\n') => {}
            Some('\r') => {
                if self.peek() == Some('\n') {
                    self.advance();
                }
            }
            Some(other) => out.push(other),
        }
        Ok(())
    }

    /// Turn a UTF-16 code unit into a char, pairing a high surrogate with the
    /// `\uXXXX` low surrogate that follows it
    fn lex_code_unit(&mut self, code: u32, at: usize) -> Result<char, EngineError> {
        if (0xD800..0xDC00).contains(&code) && self.peek_n(2) == Some("\\u") {
            let rewind = self.pos;
            self.pos += 2;
            let low = self.lex_hex(4, at)?;
            if (0xDC00..0xE000).contains(&low) {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return Ok(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            self.pos = rewind;
        }
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn lex_hex(&mut self, digits: usize, at: usize) -> Result<u32, EngineError> {
        let hex = self
            .peek_n(digits)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| syntax("invalid hexadecimal escape sequence", at))?;
        let code = u32::from_str_radix(hex, 16).map_err(|e| syntax(e.to_string(), at))?;
        self.pos += digits;
        Ok(code)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn syntax(message: impl Into<String>, offset: usize) -> EngineError {
    EngineError::Syntax {
        message: message.into(),
        offset,
    }
}
