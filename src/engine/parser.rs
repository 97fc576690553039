//! Parser for invocation scripts
//!
//! Grammar, with statements separated by `;`:
//!
//! ```text
//! statement := "var" IDENT "=" expr | expr
//! expr      := "new" IDENT "(" object? ")"
//!            | IDENT "." IDENT "(" ")"
//!            | IDENT "." "partials" "." IDENT "=" STRING
//! value     := STRING | object | "JSON" "." "parse" "(" STRING ")"
//! object    := "{" (key ":" value ("," key ":" value)* ","?)? "}"
//! key       := IDENT | STRING
//! ```

use super::EngineError;
use super::lexer::{Lexer, Token, TokenKind};

/// A literal value in an options object
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string literal, escapes already decoded
    Str(String),
    /// An object literal, entries in source order
    Object(Vec<(String, Value)>),
    /// `JSON.parse('...')` with the decoded argument
    JsonParse(String),
}

/// An expression statement or the initializer of a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `new Ctor({ ... })`
    New {
        constructor: String,
        options: Vec<(String, Value)>,
    },
    /// `target.method()`
    Call { target: String, method: String },
    /// `Ctor.partials.name = '...'`
    RegisterPartial {
        constructor: String,
        name: String,
        content: String,
    },
}

/// A top-level statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `var binding = init`
    Declare { binding: String, init: Expr },
    Expr(Expr),
}

/// Recursive-descent parser over a token vector
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, EngineError> {
        Ok(Self {
            tokens: Lexer::new(source).tokenize()?,
            pos: 0,
        })
    }

    /// Parse every statement in the script.
    pub fn parse_program(mut self) -> Result<Vec<Statement>, EngineError> {
        let mut statements = Vec::new();

        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.at(&TokenKind::Eof) {
                return Ok(statements);
            }

            statements.push(self.parse_statement()?);

            if !self.eat(&TokenKind::Semicolon) && !self.at(&TokenKind::Eof) {
                return Err(self.unexpected("';'"));
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, EngineError> {
        if self.eat_keyword("var") {
            let binding = self.expect_ident()?;
            self.expect(&TokenKind::Assign)?;
            let init = self.parse_expr()?;
            return Ok(Statement::Declare {
                binding,
                init,
            });
        }
        Ok(Statement::Expr(self.parse_expr()?))
    }

    fn parse_expr(&mut self) -> Result<Expr, EngineError> {
        if self.eat_keyword("new") {
            let constructor = self.expect_ident()?;
            self.expect(&TokenKind::LParen)?;
            let options = if self.at(&TokenKind::LBrace) {
                self.parse_object()?
            } else {
                Vec::new()
            };
            self.expect(&TokenKind::RParen)?;
            return Ok(Expr::New {
                constructor,
                options,
            });
        }

        let target = self.expect_ident()?;
        self.expect(&TokenKind::Dot)?;
        let member = self.expect_ident()?;

        if self.eat(&TokenKind::LParen) {
            self.expect(&TokenKind::RParen)?;
            return Ok(Expr::Call {
                target,
                method: member,
            });
        }

        if member == "partials" {
            self.expect(&TokenKind::Dot)?;
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Assign)?;
            let content = self.expect_string()?;
            return Ok(Expr::RegisterPartial {
                constructor: target,
                name,
                content,
            });
        }

        Err(self.unexpected("'('"))
    }

    fn parse_object(&mut self) -> Result<Vec<(String, Value)>, EngineError> {
        self.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();

        while !self.eat(&TokenKind::RBrace) {
            let key = match &self.peek().kind {
                TokenKind::Ident(name) | TokenKind::String(name) => name.clone(),
                _ => return Err(self.unexpected("property name")),
            };
            self.advance();
            self.expect(&TokenKind::Colon)?;
            entries.push((key, self.parse_value()?));

            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }

        Ok(entries)
    }

    fn parse_value(&mut self) -> Result<Value, EngineError> {
        if self.at(&TokenKind::LBrace) {
            return Ok(Value::Object(self.parse_object()?));
        }
        if self.eat_keyword("JSON") {
            self.expect(&TokenKind::Dot)?;
            if !self.eat_keyword("parse") {
                return Err(self.unexpected("'parse'"));
            }
            self.expect(&TokenKind::LParen)?;
            let text = self.expect_string()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(Value::JsonParse(text));
        }
        Ok(Value::Str(self.expect_string()?))
    }

    fn peek(&self) -> &Token {
        // The token vector always ends with Eof and is never advanced past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), EngineError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn expect_ident(&mut self) -> Result<String, EngineError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn expect_string(&mut self) -> Result<String, EngineError> {
        match &self.peek().kind {
            TokenKind::String(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected("string literal")),
        }
    }

    fn unexpected(&self, expected: &str) -> EngineError {
        let token = self.peek();
        EngineError::Syntax {
            message: format!("expected {expected}, found {}", token.kind.describe()),
            offset: token.offset,
        }
    }
}

/// Parse `source` into statements.
pub fn parse(source: &str) -> Result<Vec<Statement>, EngineError> {
    Parser::new(source)?.parse_program()
}
