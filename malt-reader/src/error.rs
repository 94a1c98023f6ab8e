// malt-reader - Reader errors
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use thiserror::Error;

/// Errors produced while turning text into values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Malformed tokens, unbalanced delimiters, bad escapes or an odd map literal.
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    /// The text held nothing but whitespace, commas and comments.
    #[error("No input")]
    NoInput,
}

impl ReadError {
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        ReadError::Syntax {
            message: message.into(),
            line,
            column,
        }
    }
}
