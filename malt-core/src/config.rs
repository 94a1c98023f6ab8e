// malt-core - Interpreter configuration
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use crate::eval::DEFAULT_MAX_EVAL_DEPTH;

/// Settings for an [`Interpreter`](crate::Interpreter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting of non-tail evaluation. Tail calls never count.
    pub max_eval_depth: usize,
    /// Evaluate the embedded bootstrap library on construction.
    pub load_prelude: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
            load_prelude: true,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        self.max_eval_depth = depth;
        self
    }

    #[must_use]
    pub fn without_prelude(mut self) -> Self {
        self.load_prelude = false;
        self
    }
}
