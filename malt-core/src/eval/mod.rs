// malt-core - Evaluator for malt
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tree-walking evaluator.
//!
//! Evaluation runs as a trampoline over an `(expr, env)` pair. Special forms
//! and closure application in tail position hand back a [`Step::TailCall`]
//! instead of recursing, so a self-recursive function in tail position runs in
//! constant native stack. Everything else (operands, conditions, non-final `do`
//! forms, `let*` bindings) recurses through [`eval`] and is bounded by the
//! configured maximum depth.

mod apply;
mod special_forms;

use std::cell::Cell;

use malt_reader::{Value, ensure_sufficient_stack};

use crate::env::Env;
use crate::error::{Error, Result};

pub use apply::{apply, make_native_fn};
use special_forms::SpecialForm;

// ============================================================================
// Stack Overflow Protection
// ============================================================================

/// Maximum recursion depth for eval. Can be configured via `set_max_eval_depth`.
pub(crate) const DEFAULT_MAX_EVAL_DEPTH: usize = 10_000;

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_EVAL_DEPTH: Cell<usize> = const { Cell::new(DEFAULT_MAX_EVAL_DEPTH) };
}

/// Set the maximum eval recursion depth. Returns the previous value.
#[inline]
#[must_use]
pub fn set_max_eval_depth(depth: usize) -> usize {
    MAX_EVAL_DEPTH.with(|d| d.replace(depth))
}

/// Get the current maximum eval recursion depth.
#[inline]
#[must_use]
pub fn get_max_eval_depth() -> usize {
    MAX_EVAL_DEPTH.with(|d| d.get())
}

/// Get the current eval recursion depth.
#[inline]
#[must_use]
pub fn get_eval_depth() -> usize {
    EVAL_DEPTH.with(|d| d.get())
}

/// RAII guard to manage eval depth counter.
struct EvalDepthGuard;

impl EvalDepthGuard {
    fn new() -> Result<Self> {
        let (current, max) = EVAL_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            (current + 1, MAX_EVAL_DEPTH.with(|m| m.get()))
        });
        if current > max {
            EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            tracing::warn!(limit = max, "maximum evaluation depth exceeded");
            Err(Error::DepthExceeded { limit: max })
        } else {
            Ok(EvalDepthGuard)
        }
    }
}

impl Drop for EvalDepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

// ============================================================================
// Trampoline
// ============================================================================

/// What a special form or application wants the evaluator to do next.
pub(crate) enum Step {
    /// Evaluation finished with this value.
    Return(Value),
    /// Continue by evaluating this expression in this environment.
    TailCall(Value, Env),
}

/// Evaluate an expression in the given environment.
pub fn eval(expr: &Value, env: &Env) -> Result<Value> {
    let _guard = EvalDepthGuard::new()?;
    ensure_sufficient_stack(|| eval_loop(expr.clone(), env.clone()))
}

fn eval_loop(mut expr: Value, mut env: Env) -> Result<Value> {
    loop {
        let items = match &expr {
            Value::List(items) if !items.is_empty() => items.clone(),
            Value::List(_) => return Ok(expr),
            _ => return eval_ast(&expr, &env),
        };

        let special = match items.front() {
            Some(Value::Symbol(sym)) => SpecialForm::from_name(sym.name()),
            _ => None,
        };

        let step = match special {
            Some(form) => special_forms::eval_special(form, &items, &env)?,
            None => apply::eval_application(&items, &env)?,
        };

        match step {
            Step::Return(value) => return Ok(value),
            Step::TailCall(next_expr, next_env) => {
                expr = next_expr;
                env = next_env;
            }
        }
    }
}

/// Evaluate a non-application form.
///
/// Symbols resolve through the environment. Lists and vectors evaluate each
/// element left to right and keep their kind. Maps evaluate their values and
/// leave keys alone. Everything else evaluates to itself.
pub fn eval_ast(expr: &Value, env: &Env) -> Result<Value> {
    match expr {
        Value::Symbol(sym) => env.lookup(sym),
        Value::List(items) => Ok(Value::List(eval_items(items.iter(), env)?.into())),
        Value::Vector(items) => Ok(Value::Vector(eval_items(items.iter(), env)?.into())),
        Value::Map(map) => {
            let mut out = map.clone();
            for (k, v) in map.iter() {
                out.insert(k.clone(), eval(v, env)?);
            }
            Ok(Value::Map(out))
        }
        _ => Ok(expr.clone()),
    }
}

pub(crate) fn eval_items<'a>(
    items: impl Iterator<Item = &'a Value>,
    env: &Env,
) -> Result<Vec<Value>> {
    items.map(|item| eval(item, env)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::register_builtins;
    use malt_reader::read_str;

    fn run(src: &str) -> Result<Value> {
        let env = Env::new();
        register_builtins(&env);
        eval(&read_str(src)?, &env)
    }

    #[test]
    fn test_self_evaluating() {
        assert_eq!(run("42").unwrap(), Value::int(42));
        assert_eq!(run(":k").unwrap(), Value::keyword("k"));
        assert_eq!(run("\"s\"").unwrap(), Value::string("s"));
        assert_eq!(run("nil").unwrap(), Value::Nil);
    }

    #[test]
    fn test_empty_list_is_itself() {
        assert_eq!(run("()").unwrap(), Value::empty_list());
    }

    #[test]
    fn test_vector_and_map_evaluate_contents() {
        assert_eq!(
            run("[1 (+ 1 1)]").unwrap(),
            Value::vector(vec![Value::int(1), Value::int(2)])
        );
        assert_eq!(
            run("{:a (+ 1 2)}").unwrap(),
            Value::map(vec![(Value::keyword("a"), Value::int(3))])
        );
    }

    #[test]
    fn test_depth_guard_resets() {
        let before = get_eval_depth();
        let _ = run("(+ 1 (+ 2 (+ 3 undefined)))");
        assert_eq!(get_eval_depth(), before);
    }

    #[test]
    fn test_depth_limit() {
        let previous = set_max_eval_depth(20);
        let env = Env::new();
        register_builtins(&env);
        let src = format!("{}0{}", "(+ 1 ".repeat(50), ")".repeat(50));
        let result = eval(&read_str(&src).unwrap(), &env);
        let _ = set_max_eval_depth(previous);
        assert!(matches!(result, Err(Error::DepthExceeded { limit: 20 })));
    }
}
