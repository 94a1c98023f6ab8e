// malt-core - List built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! List operations: list, list?, empty?, count

use malt_reader::Value;

use crate::error::{Error, Result};

use super::expect_arity;

/// Element count of a list, vector or nil (which counts as empty).
fn seq_len(name: &'static str, val: &Value) -> Result<usize> {
    match val {
        Value::Nil => Ok(0),
        Value::List(items) | Value::Vector(items) => Ok(items.len()),
        other => Err(Error::type_error_in(name, "sequence or nil", other.type_name())),
    }
}

pub(crate) fn builtin_list(args: &[Value]) -> Result<Value> {
    Ok(Value::list(args.to_vec()))
}

pub(crate) fn builtin_list_p(args: &[Value]) -> Result<Value> {
    expect_arity("list?", args, 1)?;
    Ok(Value::bool(matches!(args[0], Value::List(_))))
}

pub(crate) fn builtin_empty_p(args: &[Value]) -> Result<Value> {
    expect_arity("empty?", args, 1)?;
    Ok(Value::bool(seq_len("empty?", &args[0])? == 0))
}

pub(crate) fn builtin_count(args: &[Value]) -> Result<Value> {
    expect_arity("count", args, 1)?;
    let len = seq_len("count", &args[0])?;
    Ok(Value::int(i64::try_from(len).unwrap_or(i64::MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list() {
        assert_eq!(builtin_list(&[]).unwrap(), Value::empty_list());
        assert_eq!(
            builtin_list(&[Value::int(1), Value::int(2)]).unwrap(),
            Value::list(vec![Value::int(1), Value::int(2)])
        );
    }

    #[test]
    fn test_list_p() {
        assert_eq!(
            builtin_list_p(&[Value::empty_list()]).unwrap(),
            Value::bool(true)
        );
        assert_eq!(
            builtin_list_p(&[Value::vector(vec![])]).unwrap(),
            Value::bool(false)
        );
        assert!(builtin_list_p(&[]).is_err());
    }

    #[test]
    fn test_count() {
        assert_eq!(builtin_count(&[Value::Nil]).unwrap(), Value::int(0));
        assert_eq!(
            builtin_count(&[Value::vector(vec![Value::Nil, Value::Nil])]).unwrap(),
            Value::int(2)
        );
        assert!(builtin_count(&[Value::int(3)]).is_err());
    }

    #[test]
    fn test_empty_p() {
        assert_eq!(builtin_empty_p(&[Value::Nil]).unwrap(), Value::bool(true));
        assert_eq!(
            builtin_empty_p(&[Value::list(vec![Value::int(1)])]).unwrap(),
            Value::bool(false)
        );
        assert!(builtin_empty_p(&[Value::string("")]).is_err());
    }
}
