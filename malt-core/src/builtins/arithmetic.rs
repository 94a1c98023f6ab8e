// malt-core - Arithmetic built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Arithmetic operations: +, -, *, /
//!
//! ## Integer Overflow Behaviour
//!
//! Operands are integers only. Results that overflow `i64` are promoted to
//! arbitrary precision, and arbitrary-precision results that fit back in an
//! `i64` are demoted again. `/` truncates toward zero.

use malt_reader::Value;
use num_bigint::BigInt;
use num_traits::Zero;

use crate::error::{Error, Result};

use super::to_bigint;

// ============================================================================
// Helpers
// ============================================================================

/// Reject any operand that is not an integer, naming the operation.
fn require_integers(name: &'static str, args: &[Value]) -> Result<()> {
    for arg in args {
        if !matches!(arg, Value::Int(_) | Value::BigInt(_)) {
            return Err(Error::type_error_in(name, "integer", arg.type_name()));
        }
    }
    Ok(())
}

/// Left-fold `args` with `op`, after checking every operand is an integer.
///
/// With no arguments the result is `identity`, or an arity error when the
/// operation has none.
fn fold(
    name: &'static str,
    args: &[Value],
    identity: Option<i64>,
    op: fn(&'static str, &Value, &Value) -> Result<Value>,
) -> Result<Value> {
    require_integers(name, args)?;
    let Some((first, rest)) = args.split_first() else {
        return identity
            .map(Value::int)
            .ok_or_else(|| Error::arity_at_least_named(name, 1, 0));
    };
    let mut acc = first.clone();
    for arg in rest {
        acc = op(name, &acc, arg)?;
    }
    Ok(acc)
}

/// Apply a checked `i64` operation, falling back to `BigInt` on overflow or
/// when either side is already big.
fn int_op(
    name: &'static str,
    a: &Value,
    b: &Value,
    small: fn(i64, i64) -> Option<i64>,
    big: fn(BigInt, BigInt) -> BigInt,
) -> Result<Value> {
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        if let Some(result) = small(*x, *y) {
            return Ok(Value::int(result));
        }
    }
    Ok(Value::bigint(big(to_bigint(name, a)?, to_bigint(name, b)?)))
}

fn add(name: &'static str, a: &Value, b: &Value) -> Result<Value> {
    int_op(name, a, b, i64::checked_add, |x, y| x + y)
}

fn sub(name: &'static str, a: &Value, b: &Value) -> Result<Value> {
    int_op(name, a, b, i64::checked_sub, |x, y| x - y)
}

fn mul(name: &'static str, a: &Value, b: &Value) -> Result<Value> {
    int_op(name, a, b, i64::checked_mul, |x, y| x * y)
}

fn div(name: &'static str, a: &Value, b: &Value) -> Result<Value> {
    let divisor = to_bigint(name, b)?;
    if divisor.is_zero() {
        return Err(Error::DivisionByZero);
    }
    // i64::MIN / -1 overflows and takes the BigInt path
    int_op(name, a, b, i64::checked_div, |x, y| x / y)
}

// ============================================================================
// Builtins
// ============================================================================

pub(crate) fn builtin_add(args: &[Value]) -> Result<Value> {
    fold("+", args, Some(0), add)
}

pub(crate) fn builtin_sub(args: &[Value]) -> Result<Value> {
    fold("-", args, None, sub)
}

pub(crate) fn builtin_mul(args: &[Value]) -> Result<Value> {
    fold("*", args, Some(1), mul)
}

pub(crate) fn builtin_div(args: &[Value]) -> Result<Value> {
    fold("/", args, None, div)
}
