// malt-core - Error types for the malt evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types for malt evaluation.

use std::fmt;

use malt_reader::{ReadError, Symbol};
use thiserror::Error;

/// Result type for malt evaluation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or evaluating.
///
/// Every error aborts only the current top-level form. Definitions made before
/// the failing sub-expression stay in place.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Reader failure, including the recoverable "no input" case
    #[error(transparent)]
    Read(#[from] ReadError),
    /// Malformed special form or parameter list
    #[error("Invalid '{form}' syntax: {message}")]
    InvalidSyntax { form: &'static str, message: String },
    /// Undefined symbol reference
    #[error("'{0}' not found")]
    UndefinedSymbol(Symbol),
    /// Wrong number of arguments to a function or special form
    #[error("{}", arity_message(.name, .expected, .got))]
    ArityError {
        expected: AritySpec,
        got: usize,
        name: Option<String>,
    },
    /// Wrong value kind for an operation
    #[error("{}", type_message(.context, .expected, .got))]
    TypeError {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },
    /// Attempted to call something that isn't callable
    #[error("Cannot call value: {0}")]
    NotCallable(String),
    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,
    /// `slurp` target does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    /// `slurp` target exists but could not be read as text
    #[error("Unable to read file {path}: {message}")]
    FileUnreadable { path: String, message: String },
    /// Non-tail evaluation nested deeper than the configured limit
    #[error("Maximum evaluation depth ({limit}) exceeded")]
    DepthExceeded { limit: usize },
    /// Internal error - invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Specification for expected arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
            AritySpec::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

fn arity_message(name: &Option<String>, expected: &AritySpec, got: &usize) -> String {
    match name {
        Some(name) => format!(
            "Wrong number of arguments to '{}': expected {}, got {}",
            name, expected, got
        ),
        None => format!(
            "Wrong number of arguments: expected {}, got {}",
            expected, got
        ),
    }
}

fn type_message(context: &Option<String>, expected: &str, got: &str) -> String {
    match context {
        Some(ctx) => format!("{}: expected {}, got {}", ctx, expected, got),
        None => format!("Type error: expected {}, got {}", expected, got),
    }
}

/// Coarse error categories, for callers that pick a recovery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    NoInput,
    UnboundSymbol,
    Arity,
    Type,
    NotCallable,
    Arithmetic,
    File,
    DepthExceeded,
    Internal,
}

impl Error {
    /// Create an arity error for exact arity.
    pub fn arity(expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Exact(expected),
            got,
            name: None,
        }
    }

    /// Create an arity error for exact arity with function name.
    pub fn arity_named(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Exact(expected),
            got,
            name: Some(name.into()),
        }
    }

    /// Create an arity error for minimum arity.
    pub fn arity_at_least(expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::AtLeast(expected),
            got,
            name: None,
        }
    }

    /// Create an arity error for minimum arity with function name.
    pub fn arity_at_least_named(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::AtLeast(expected),
            got,
            name: Some(name.into()),
        }
    }

    /// Create an arity error for a bounded range with function name.
    pub fn arity_range_named(
        name: impl Into<String>,
        min: usize,
        max: usize,
        got: usize,
    ) -> Self {
        Error::ArityError {
            expected: AritySpec::Range(min, max),
            got,
            name: Some(name.into()),
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::TypeError {
            expected,
            got,
            context: None,
        }
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::TypeError {
            expected,
            got,
            context: Some(context.into()),
        }
    }

    /// Create an invalid syntax error.
    pub fn syntax(form: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidSyntax {
            form,
            message: message.into(),
        }
    }

    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Read(ReadError::NoInput) => ErrorKind::NoInput,
            Error::Read(ReadError::Syntax { .. }) | Error::InvalidSyntax { .. } => {
                ErrorKind::Syntax
            }
            Error::UndefinedSymbol(_) => ErrorKind::UnboundSymbol,
            Error::ArityError { .. } => ErrorKind::Arity,
            Error::TypeError { .. } => ErrorKind::Type,
            Error::NotCallable(_) => ErrorKind::NotCallable,
            Error::DivisionByZero => ErrorKind::Arithmetic,
            Error::FileNotFound { .. } | Error::FileUnreadable { .. } => ErrorKind::File,
            Error::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// True for blank or comment-only input, which callers should skip silently.
    pub fn is_no_input(&self) -> bool {
        self.kind() == ErrorKind::NoInput
    }
}
