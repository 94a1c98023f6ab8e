// malt-reader - Symbol type
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols name bindings in an environment.
//!
//! A symbol is a cheaply clonable, immutable name. Two symbols are equal when
//! their names are equal; a symbol never equals a [`Keyword`](crate::Keyword)
//! even when both carry the same text.

use std::fmt;
use std::rc::Rc;

/// An identifier resolved through the environment chain.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: Rc<str>,
}

impl Symbol {
    /// Create a symbol with the given name.
    pub fn new(name: &str) -> Self {
        Symbol {
            name: Rc::from(name),
        }
    }

    /// Get the symbol's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for the `&` marker that introduces a rest parameter.
    #[must_use]
    pub fn is_rest_marker(&self) -> bool {
        &*self.name == "&"
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_equality() {
        assert_eq!(Symbol::new("foo"), Symbol::new("foo"));
        assert_ne!(Symbol::new("foo"), Symbol::new("bar"));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(format!("{}", Symbol::new("let*")), "let*");
    }

    #[test]
    fn test_rest_marker() {
        assert!(Symbol::new("&").is_rest_marker());
        assert!(!Symbol::new("&rest").is_rest_marker());
    }
}
