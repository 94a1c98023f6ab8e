// malt-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers and utilities for malt integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`eval_str`] - Evaluate code in a fresh environment with builtins
//! - [`eval_str_with_env`] - Evaluate code in an existing environment
//! - [`eval_all`] - Evaluate multiple expressions, returning the last
//! - [`new_env`] - Create a new environment with builtins and `eval` registered
//! - [`rep`] - Run text through a fresh [`Interpreter`] with the prelude
//!
//! # Macros
//!
//! - [`assert_eval!`] - Assert that code evaluates to an expected value
//! - [`assert_eval_err!`] - Assert that code produces an error
//! - [`assert_eval_err_contains!`] - Assert that an error message contains text
//! - [`assert_eval_with_env!`] - Assert evaluation with a shared environment

// Re-export common types for convenience
#[allow(unused_imports)]
pub use malt_core::{Env, Error, ErrorKind, Interpreter, eval, register_builtins, register_eval};
#[allow(unused_imports)]
pub use malt_reader::{Keyword, Parser, Symbol, Value, read_str};

/// Evaluate a malt expression string in a fresh environment.
///
/// The environment has the builtins and `eval`, but not the prelude.
///
/// # Returns
///
/// Returns the evaluated value, or an error message string.
#[allow(dead_code)]
pub fn eval_str(s: &str) -> Result<Value, String> {
    let env = new_env();
    eval_str_with_env(s, &env)
}

/// Evaluate a malt expression string in the given environment.
///
/// # Returns
///
/// Returns the evaluated value, or an error message string.
#[allow(dead_code)]
pub fn eval_str_with_env(s: &str, env: &Env) -> Result<Value, String> {
    let expr = read_str(s).map_err(|e| e.to_string())?;
    eval(&expr, env).map_err(|e| e.to_string())
}

/// Evaluate a string and return the typed error, for tests that check kinds.
#[allow(dead_code)]
pub fn eval_err_kind(s: &str) -> Option<ErrorKind> {
    let env = new_env();
    let result = read_str(s)
        .map_err(Error::from)
        .and_then(|expr| eval(&expr, &env));
    result.err().map(|e| e.kind())
}

/// Evaluate multiple malt expressions, returning the last result.
///
/// This is useful when you need to set up definitions before the final
/// expression. Each expression is parsed and evaluated sequentially.
#[allow(dead_code)]
pub fn eval_all(s: &str, env: &Env) -> Result<Value, String> {
    let mut parser = Parser::new(s);
    let mut result = Value::Nil;

    while let Some(expr) = parser.parse().map_err(|e| e.to_string())? {
        result = eval(&expr, env).map_err(|e| e.to_string())?;
    }

    Ok(result)
}

/// Create a new environment with builtins and `eval` registered.
#[allow(dead_code)]
pub fn new_env() -> Env {
    let env = Env::new();
    register_builtins(&env);
    register_eval(&env);
    env
}

/// Run `s` through a fresh interpreter (prelude loaded) and print the result.
#[allow(dead_code)]
pub fn rep(s: &str) -> Result<String, String> {
    let interp = Interpreter::new().map_err(|e| e.to_string())?;
    interp.rep(s).map_err(|e| e.to_string())
}

/// Parse a literal for use as an expected value.
#[allow(dead_code)]
pub fn lit(s: &str) -> Value {
    read_str(s).unwrap()
}

/// Assert that evaluating `input` produces the expected value.
///
/// # Example
///
/// ```ignore
/// assert_eval!("(+ 1 2)", Value::int(3));
/// ```
#[macro_export]
macro_rules! assert_eval {
    ($input:expr, $expected:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}

/// Assert that evaluating `input` produces an error.
#[macro_export]
macro_rules! assert_eval_err {
    ($input:expr) => {
        let result = $crate::common::eval_str($input);
        assert!(
            result.is_err(),
            "Expected error for '{}' but got {:?}",
            $input,
            result.ok()
        );
    };
}

/// Assert that evaluating `input` fails with a message containing `needle`.
#[macro_export]
macro_rules! assert_eval_err_contains {
    ($input:expr, $needle:expr) => {
        let result = $crate::common::eval_str($input);
        match result {
            Ok(val) => panic!("Expected error for '{}' but got {:?}", $input, val),
            Err(e) => assert!(
                e.contains($needle),
                "Error for '{}' was {:?}, expected it to mention {:?}",
                $input,
                e,
                $needle
            ),
        }
    };
}

/// Assert that evaluating `input` in the given environment produces the expected value.
#[macro_export]
macro_rules! assert_eval_with_env {
    ($input:expr, $expected:expr, $env:expr) => {
        let result = $crate::common::eval_str_with_env($input, $env);
        assert!(
            result.is_ok(),
            "Failed to evaluate '{}': {:?}",
            $input,
            result.err()
        );
        assert_eq!(
            result.unwrap(),
            $expected,
            "Evaluation of '{}' did not match expected",
            $input
        );
    };
}
