// malt-core - Interpreter entry point
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The read-eval-print entry point shared by the bootstrap loader, the
//! command-line front end and embedders.

use malt_reader::{Parser, Value, pr_str, read_str};

use crate::builtins::{register_builtins, register_eval};
use crate::config::Config;
use crate::env::Env;
use crate::error::Result;
use crate::eval::{eval, set_max_eval_depth};

/// Embedded bootstrap library, loaded unless [`Config::load_prelude`] is off.
pub const CORE_PRELUDE: &str = include_str!("../prelude/core.mal");

/// An evaluator with its own global environment.
///
/// Interpreters share nothing, so several can run side by side on one thread.
///
/// # Examples
///
/// ```
/// use malt_core::Interpreter;
///
/// let interp = Interpreter::new().unwrap();
/// interp.rep("(def! sq (fn* (x) (* x x)))").unwrap();
/// assert_eq!(interp.rep("(sq 12)").unwrap(), "144");
/// ```
pub struct Interpreter {
    global: Env,
    config: Config,
}

impl Interpreter {
    /// Create an interpreter with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an interpreter, loading the bootstrap library if configured.
    ///
    /// Fails only if the bootstrap library does not evaluate cleanly.
    pub fn with_config(config: Config) -> Result<Self> {
        let global = Env::new();
        register_builtins(&global);
        register_eval(&global);

        let interp = Interpreter { global, config };
        if interp.config.load_prelude {
            interp.load_bootstrap(CORE_PRELUDE)?;
        }
        Ok(interp)
    }

    /// The global environment.
    pub fn global(&self) -> &Env {
        &self.global
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the first form in `text`, evaluate it and print the result readably.
    pub fn rep(&self, text: &str) -> Result<String> {
        let span = tracing::debug_span!("rep", input_len = text.len());
        let _entered = span.enter();
        let value = self.eval_str(text)?;
        Ok(pr_str(&value, true))
    }

    /// Evaluate every form in `text` as the body of one `do`.
    pub fn load_bootstrap(&self, text: &str) -> Result<()> {
        tracing::info!(bytes = text.len(), "loading bootstrap library");
        // The newline keeps a trailing comment from swallowing the paren
        self.rep(&format!("(do {}\n)", text))?;
        Ok(())
    }

    /// Read the first form in `text` and evaluate it.
    pub fn eval_str(&self, text: &str) -> Result<Value> {
        let form = read_str(text)?;
        self.eval_form(&form)
    }

    /// Evaluate each form in `text` in order, returning the last value.
    ///
    /// Text with no forms evaluates to nil.
    pub fn eval_all(&self, text: &str) -> Result<Value> {
        let mut parser = Parser::new(text);
        let mut result = Value::Nil;
        while let Some(form) = parser.parse()? {
            result = self.eval_form(&form)?;
        }
        Ok(result)
    }

    /// Evaluate an already-read form against the global environment.
    pub fn eval_form(&self, form: &Value) -> Result<Value> {
        let _limit = DepthLimit::enter(self.config.max_eval_depth);
        eval(form, &self.global)
    }
}

/// Closures defined at top level capture the global environment that binds
/// them. Clearing the bindings on drop releases that cycle; an [`Env`] cloned
/// out through [`Interpreter::global`] is left empty.
impl Drop for Interpreter {
    fn drop(&mut self) {
        self.global.clear();
        tracing::trace!("global environment released");
    }
}

/// Applies an interpreter's depth limit for the duration of one evaluation.
struct DepthLimit {
    previous: usize,
}

impl DepthLimit {
    fn enter(limit: usize) -> Self {
        DepthLimit {
            previous: set_max_eval_depth(limit),
        }
    }
}

impl Drop for DepthLimit {
    fn drop(&mut self) {
        let _ = set_max_eval_depth(self.previous);
    }
}
