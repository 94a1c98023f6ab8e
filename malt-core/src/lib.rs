// malt-core - Runtime and evaluator for the malt programming language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # malt-core
//!
//! Runtime and evaluator for the malt programming language.
//! Provides the environment chain, a tail-call-eliminating evaluator, the
//! native builtins and the [`Interpreter`] entry point.

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod interpreter;

pub use builtins::{register_builtins, register_eval};
pub use config::Config;
pub use env::{Env, WeakEnv};
pub use error::{AritySpec, Error, ErrorKind, Result};
pub use eval::{
    apply, eval, eval_ast, get_eval_depth, get_max_eval_depth, make_native_fn,
    set_max_eval_depth,
};
pub use interpreter::{CORE_PRELUDE, Interpreter};

// Re-export reader types for convenience
pub use malt_reader::{Keyword, Symbol, Value};
