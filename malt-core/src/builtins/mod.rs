// malt-core - Built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Built-in functions for malt.

// Value has interior mutability for atoms, which hash by identity
#![allow(clippy::mutable_key_type)]

mod arithmetic;
mod atoms;
mod collections;
mod comparison;
mod io;

use malt_reader::{Symbol, Value, ensure_sufficient_stack};
use num_bigint::BigInt;

use crate::env::Env;
use crate::error::{Error, Result};
use crate::eval::{eval, make_native_fn};

use arithmetic::{builtin_add, builtin_div, builtin_mul, builtin_sub};
use atoms::{builtin_atom, builtin_atom_p, builtin_deref, builtin_reset, builtin_swap};
use collections::{builtin_count, builtin_empty_p, builtin_list, builtin_list_p};
use comparison::{builtin_eq, builtin_ge, builtin_gt, builtin_le, builtin_lt};
use io::{
    builtin_pr_str, builtin_println, builtin_prn, builtin_read_string, builtin_slurp, builtin_str,
};

/// Register all built-in functions in the given environment.
pub fn register_builtins(env: &Env) {
    // Arithmetic
    env.define_native("+", builtin_add);
    env.define_native("-", builtin_sub);
    env.define_native("*", builtin_mul);
    env.define_native("/", builtin_div);

    // Comparison
    env.define_native("=", builtin_eq);
    env.define_native("<", builtin_lt);
    env.define_native("<=", builtin_le);
    env.define_native(">", builtin_gt);
    env.define_native(">=", builtin_ge);

    // Lists
    env.define_native("list", builtin_list);
    env.define_native("list?", builtin_list_p);
    env.define_native("empty?", builtin_empty_p);
    env.define_native("count", builtin_count);

    // Printing and reading
    env.define_native("pr-str", builtin_pr_str);
    env.define_native("str", builtin_str);
    env.define_native("prn", builtin_prn);
    env.define_native("println", builtin_println);
    env.define_native("read-string", builtin_read_string);
    env.define_native("slurp", builtin_slurp);

    // Atoms
    env.define_native("atom", builtin_atom);
    env.define_native("atom?", builtin_atom_p);
    env.define_native("deref", builtin_deref);
    env.define_native("reset!", builtin_reset);
    env.define_native("swap!", builtin_swap);
}

/// Register `eval` in `global`.
///
/// `eval` always evaluates in `global`, whatever scope it is called from.
/// It holds the environment weakly since the environment holds it.
pub fn register_eval(global: &Env) {
    let target = global.downgrade();
    let native = make_native_fn("eval", move |args| {
        if args.len() != 1 {
            return Err(Error::arity_named("eval", 1, args.len()));
        }
        let env = target
            .upgrade()
            .ok_or_else(|| Error::Internal("global environment has been dropped".into()))?;
        eval(&args[0], &env)
    });
    global.define(Symbol::new("eval"), Value::NativeFn(native));
}

/// Helper trait to define native functions more easily.
pub trait EnvExt {
    fn define_native(&self, name: &'static str, func: fn(&[Value]) -> Result<Value>);
}

impl EnvExt for Env {
    fn define_native(&self, name: &'static str, func: fn(&[Value]) -> Result<Value>) {
        let native = make_native_fn(name, func);
        self.define(Symbol::new(name), Value::NativeFn(native));
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Check an exact argument count.
pub(crate) fn expect_arity(name: &'static str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::arity_named(name, expected, args.len()));
    }
    Ok(())
}

/// Widen an integer value for arbitrary-precision arithmetic.
pub(crate) fn to_bigint(name: &str, val: &Value) -> Result<BigInt> {
    match val {
        Value::Int(n) => Ok(BigInt::from(*n)),
        Value::BigInt(n) => Ok((**n).clone()),
        other => Err(Error::type_error_in(name, "integer", other.type_name())),
    }
}

/// Equality as the `=` builtin sees it.
///
/// Lists and vectors with equal elements in order are equal to each other.
/// Map values compare the same way. Everything else uses structural equality.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    ensure_sufficient_stack(|| values_equal_inner(a, b))
}

fn values_equal_inner(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (
            Value::List(x) | Value::Vector(x),
            Value::List(y) | Value::Vector(y),
        ) => x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| values_equal(p, q)),
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| match y.get(k) {
                    Some(other) => values_equal(v, other),
                    None => false,
                })
        }
        _ => a == b,
    }
}
