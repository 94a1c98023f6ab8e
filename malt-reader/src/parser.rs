// malt-reader - Parser for malt
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Recursive descent parser for malt source code.
//!
//! Converts tokens into `Value` trees. Tokens are pulled from the lexer on
//! demand, so text after the first complete form is never examined by
//! [`read_str`].

use num_bigint::BigInt;

use crate::error::ReadError;
use crate::lexer::{Lexer, Span, Token};
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// The parser converts tokens into `Value` trees.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    span: Span,
}

impl Parser {
    /// Create a new parser for the given source code.
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let (current, span) = lexer.next_token();
        Parser {
            lexer,
            current,
            span,
        }
    }

    /// Parse a single form from the source.
    /// Returns None if at end of input.
    pub fn parse(&mut self) -> Result<Option<Value>, ReadError> {
        if matches!(self.current, Token::Eof) {
            return Ok(None);
        }
        let val = self.parse_form()?;
        Ok(Some(val))
    }

    /// Parse all forms from the source.
    pub fn parse_all(&mut self) -> Result<Vec<Value>, ReadError> {
        let mut forms = Vec::new();
        while let Some(form) = self.parse()? {
            forms.push(form);
        }
        Ok(forms)
    }

    // ========================================================================
    // Internal parsing methods
    // ========================================================================

    fn advance(&mut self) -> Token {
        let (next, span) = self.lexer.next_token();
        self.span = span;
        std::mem::replace(&mut self.current, next)
    }

    fn error(&self, message: impl Into<String>) -> ReadError {
        ReadError::syntax(message, self.span.line, self.span.column)
    }

    fn parse_form(&mut self) -> Result<Value, ReadError> {
        ensure_sufficient_stack(|| self.parse_form_inner())
    }

    fn parse_form_inner(&mut self) -> Result<Value, ReadError> {
        match &self.current {
            Token::LParen => {
                let items = self.parse_seq(Token::RParen)?;
                Ok(Value::list(items))
            }
            Token::LBracket => {
                let items = self.parse_seq(Token::RBracket)?;
                Ok(Value::vector(items))
            }
            Token::LBrace => self.parse_map(),

            Token::Quote => self.parse_wrapped("quote"),
            Token::Quasiquote => self.parse_wrapped("quasiquote"),
            Token::Unquote => self.parse_wrapped("unquote"),
            Token::SpliceUnquote => self.parse_wrapped("splice-unquote"),
            Token::Deref => self.parse_wrapped("deref"),
            Token::Atom(s) if s == "^" => self.parse_meta(),

            Token::Str { .. } => {
                let span = self.span;
                match self.advance() {
                    Token::Str { body, terminated } => {
                        if !terminated {
                            return Err(ReadError::syntax(
                                "expected '\"', got EOF",
                                span.line,
                                span.column,
                            ));
                        }
                        unescape(&body)
                            .map(Value::string)
                            .map_err(|msg| ReadError::syntax(msg, span.line, span.column))
                    }
                    _ => Err(self.error("expected string")),
                }
            }
            Token::Atom(_) => {
                let span = self.span;
                match self.advance() {
                    Token::Atom(text) => classify_atom(&text)
                        .map_err(|msg| ReadError::syntax(msg, span.line, span.column)),
                    _ => Err(self.error("expected atom")),
                }
            }

            // Unexpected tokens
            Token::RParen => Err(self.error("Unexpected ')'")),
            Token::RBracket => Err(self.error("Unexpected ']'")),
            Token::RBrace => Err(self.error("Unexpected '}'")),
            Token::Eof => Err(self.error("Unexpected end of input")),
        }
    }

    fn parse_seq(&mut self, close: Token) -> Result<Vec<Value>, ReadError> {
        self.advance(); // consume opener
        let mut elements = Vec::new();

        loop {
            if self.current == close {
                self.advance();
                return Ok(elements);
            }
            if matches!(self.current, Token::Eof) {
                return Err(self.error(format!("expected '{}', got EOF", close)));
            }
            elements.push(self.parse_form()?);
        }
    }

    fn parse_map(&mut self) -> Result<Value, ReadError> {
        let span = self.span;
        let items = self.parse_seq(Token::RBrace)?;
        Value::map_from_flat(items).ok_or_else(|| {
            ReadError::syntax(
                "Map literal must contain an even number of forms",
                span.line,
                span.column,
            )
        })
    }

    fn parse_wrapped(&mut self, name: &str) -> Result<Value, ReadError> {
        self.advance(); // consume the macro token
        let form = self.parse_form()?;
        Ok(Value::list(vec![Value::symbol(name), form]))
    }

    fn parse_meta(&mut self) -> Result<Value, ReadError> {
        self.advance(); // consume ^
        let meta = self.parse_form()?;
        let target = self.parse_form()?;
        // Expand to (with-meta target meta)
        Ok(Value::list(vec![Value::symbol("with-meta"), target, meta]))
    }
}

// ============================================================================
// Atom classification
// ============================================================================

fn classify_atom(text: &str) -> Result<Value, String> {
    let mut chars = text.chars();
    let first = chars.next();
    let second = chars.next();

    let numeric = match (first, second) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('-'), Some(c)) if c.is_ascii_digit() => true,
        _ => false,
    };
    if numeric {
        return parse_integer(text);
    }

    if let Some(name) = text.strip_prefix(':') {
        if !name.is_empty() {
            return Ok(Value::keyword(name));
        }
    }

    Ok(match text {
        "nil" => Value::Nil,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::symbol(text),
    })
}

fn parse_integer(text: &str) -> Result<Value, String> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid integer literal: {}", text));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    text.parse::<BigInt>()
        .map(Value::bigint)
        .map_err(|_| format!("Invalid integer literal: {}", text))
}

fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(format!("Invalid escape sequence: \\{}", other)),
            None => return Err("expected '\"', got EOF".to_string()),
        }
    }
    Ok(out)
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Read the first form in `source`.
///
/// Text after that form is ignored. Returns [`ReadError::NoInput`] when the
/// source holds only whitespace, commas and comments.
pub fn read_str(source: &str) -> Result<Value, ReadError> {
    Parser::new(source).parse()?.ok_or(ReadError::NoInput)
}

/// Read every form in `source`.
pub fn read_all(source: &str) -> Result<Vec<Value>, ReadError> {
    Parser::new(source).parse_all()
}

// ============================================================================
// Tests
// ============================================================================
