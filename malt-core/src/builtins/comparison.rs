// malt-core - Comparison built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Comparison operations: =, <, <=, >, >=
//!
//! All of them are chained: the result is true when the predicate holds for
//! every adjacent pair, left to right. Fewer than two arguments is true.

use std::cmp::Ordering;

use malt_reader::Value;

use crate::error::{Error, Result};

use super::{to_bigint, values_equal};

// ============================================================================
// Equality
// ============================================================================

pub(crate) fn builtin_eq(args: &[Value]) -> Result<Value> {
    Ok(Value::bool(
        args.windows(2).all(|pair| values_equal(&pair[0], &pair[1])),
    ))
}

// ============================================================================
// Ordering
// ============================================================================

fn compare_integers(name: &'static str, a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Int(_) | Value::BigInt(_), Value::Int(_) | Value::BigInt(_)) => {
            Ok(to_bigint(name, a)?.cmp(&to_bigint(name, b)?))
        }
        _ => {
            let offending = if matches!(a, Value::Int(_) | Value::BigInt(_)) {
                b
            } else {
                a
            };
            Err(Error::type_error_in(
                format!(
                    "{}: cannot compare {} with {}",
                    name,
                    a.type_name(),
                    b.type_name()
                ),
                "integer",
                offending.type_name(),
            ))
        }
    }
}

fn chain(name: &'static str, args: &[Value], holds: fn(Ordering) -> bool) -> Result<Value> {
    for pair in args.windows(2) {
        if !holds(compare_integers(name, &pair[0], &pair[1])?) {
            return Ok(Value::bool(false));
        }
    }
    Ok(Value::bool(true))
}

pub(crate) fn builtin_lt(args: &[Value]) -> Result<Value> {
    chain("<", args, |o| o == Ordering::Less)
}

pub(crate) fn builtin_le(args: &[Value]) -> Result<Value> {
    chain("<=", args, |o| o != Ordering::Greater)
}

pub(crate) fn builtin_gt(args: &[Value]) -> Result<Value> {
    chain(">", args, |o| o == Ordering::Greater)
}

pub(crate) fn builtin_ge(args: &[Value]) -> Result<Value> {
    chain(">=", args, |o| o != Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(ns: &[i64]) -> Vec<Value> {
        ns.iter().map(|n| Value::int(*n)).collect()
    }

    #[test]
    fn test_chained_lt() {
        assert_eq!(builtin_lt(&ints(&[1, 2, 3])).unwrap(), Value::bool(true));
        assert_eq!(builtin_lt(&ints(&[1, 3, 2])).unwrap(), Value::bool(false));
        assert_eq!(builtin_lt(&ints(&[1, 1])).unwrap(), Value::bool(false));
    }

    #[test]
    fn test_le_ge() {
        assert_eq!(builtin_le(&ints(&[1, 1, 2])).unwrap(), Value::bool(true));
        assert_eq!(builtin_ge(&ints(&[3, 3, 1])).unwrap(), Value::bool(true));
        assert_eq!(builtin_gt(&ints(&[3, 3])).unwrap(), Value::bool(false));
    }

    #[test]
    fn test_trivial_chains() {
        assert_eq!(builtin_lt(&[]).unwrap(), Value::bool(true));
        assert_eq!(builtin_gt(&ints(&[5])).unwrap(), Value::bool(true));
        assert_eq!(builtin_eq(&[]).unwrap(), Value::bool(true));
    }

    #[test]
    fn test_type_mismatch_names_types() {
        let err = builtin_lt(&[Value::int(1), Value::string("a")]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("integer"), "{}", msg);
        assert!(msg.contains("string"), "{}", msg);
    }

    #[test]
    fn test_eq_chained() {
        assert_eq!(builtin_eq(&ints(&[2, 2, 2])).unwrap(), Value::bool(true));
        assert_eq!(builtin_eq(&ints(&[2, 2, 3])).unwrap(), Value::bool(false));
        assert_eq!(
            builtin_eq(&[Value::string("a"), Value::int(1)]).unwrap(),
            Value::bool(false)
        );
    }
}
