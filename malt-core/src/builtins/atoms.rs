// malt-core - Atom built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Atom operations: atom, atom?, deref, reset!, swap!

use malt_reader::{Atom, Value};

use crate::error::{Error, Result};
use crate::eval::apply;

use super::expect_arity;

fn require_atom<'a>(name: &'static str, val: &'a Value) -> Result<&'a Atom> {
    match val {
        Value::Atom(atom) => Ok(atom),
        other => Err(Error::type_error_in(name, "atom", other.type_name())),
    }
}

/// (atom x) - create an atom with initial value x
pub(crate) fn builtin_atom(args: &[Value]) -> Result<Value> {
    expect_arity("atom", args, 1)?;
    Ok(Value::atom(args[0].clone()))
}

/// (atom? x) - true if x is an atom
pub(crate) fn builtin_atom_p(args: &[Value]) -> Result<Value> {
    expect_arity("atom?", args, 1)?;
    Ok(Value::bool(matches!(args[0], Value::Atom(_))))
}

/// (deref atom) - get the current value
pub(crate) fn builtin_deref(args: &[Value]) -> Result<Value> {
    expect_arity("deref", args, 1)?;
    Ok(require_atom("deref", &args[0])?.deref())
}

/// (reset! atom newval) - set the value, returning newval
pub(crate) fn builtin_reset(args: &[Value]) -> Result<Value> {
    expect_arity("reset!", args, 2)?;
    let atom = require_atom("reset!", &args[0])?;
    Ok(atom.reset(args[1].clone()))
}

/// (swap! atom f & args) - set the value to (apply f current args), returning it
pub(crate) fn builtin_swap(args: &[Value]) -> Result<Value> {
    if args.len() < 2 {
        return Err(Error::arity_at_least_named("swap!", 2, args.len()));
    }
    let atom = require_atom("swap!", &args[0])?;
    let func = &args[1];
    if !matches!(func, Value::NativeFn(_) | Value::Closure(_)) {
        return Err(Error::type_error_in("swap!", "function", func.type_name()));
    }

    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(atom.deref());
    call_args.extend(args[2..].iter().cloned());

    // The slot is not borrowed while `func` runs, so it may read the atom itself
    let new_val = apply(func, &call_args)?;
    Ok(atom.reset(new_val))
}
