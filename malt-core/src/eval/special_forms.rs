// malt-core - Special forms
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Special form dispatch: `def!`, `let*`, `do`, `if` and `fn*`.
//!
//! Forms whose last step is in tail position return a [`Step::TailCall`]
//! for the trampoline instead of evaluating it themselves.

use im::Vector;
use malt_reader::{Closure, Symbol, Value};

use super::{Step, eval};
use crate::env::Env;
use crate::error::{Error, Result};

/// The fixed table of special forms, keyed by head symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpecialForm {
    Def,
    Let,
    Do,
    If,
    Fn,
}

impl SpecialForm {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "def!" => Some(SpecialForm::Def),
            "let*" => Some(SpecialForm::Let),
            "do" => Some(SpecialForm::Do),
            "if" => Some(SpecialForm::If),
            "fn*" => Some(SpecialForm::Fn),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            SpecialForm::Def => "def!",
            SpecialForm::Let => "let*",
            SpecialForm::Do => "do",
            SpecialForm::If => "if",
            SpecialForm::Fn => "fn*",
        }
    }
}

/// Evaluate a special form. `items` is the whole form, head included.
pub(crate) fn eval_special(form: SpecialForm, items: &Vector<Value>, env: &Env) -> Result<Step> {
    tracing::trace!(form = form.name(), "special form");
    let args: Vec<Value> = items.iter().skip(1).cloned().collect();
    match form {
        SpecialForm::Def => eval_def(&args, env),
        SpecialForm::Let => eval_let(&args, env),
        SpecialForm::Do => eval_do(&args, env),
        SpecialForm::If => eval_if(&args, env),
        SpecialForm::Fn => eval_fn(&args, env),
    }
}

// ============================================================================
// def!
// ============================================================================

fn eval_def(args: &[Value], env: &Env) -> Result<Step> {
    if args.len() != 2 {
        return Err(Error::arity_named("def!", 2, args.len()));
    }
    let name = match &args[0] {
        Value::Symbol(sym) => sym.clone(),
        other => {
            return Err(Error::syntax(
                "def!",
                format!("name must be a symbol, got {}", other.type_name()),
            ));
        }
    };
    let value = eval(&args[1], env)?;
    env.define(name, value.clone());
    Ok(Step::Return(value))
}

// ============================================================================
// let*
// ============================================================================

fn eval_let(args: &[Value], env: &Env) -> Result<Step> {
    if args.len() != 2 {
        return Err(Error::arity_named("let*", 2, args.len()));
    }
    let bindings: Vec<Value> = match args[0].as_sequence() {
        Some(items) => items.iter().cloned().collect(),
        None => {
            return Err(Error::syntax(
                "let*",
                format!(
                    "bindings must be a list or vector, got {}",
                    args[0].type_name()
                ),
            ));
        }
    };
    if bindings.len() % 2 != 0 {
        return Err(Error::syntax(
            "let*",
            "bindings must contain an even number of forms",
        ));
    }

    // Each value sees the bindings made before it
    let scope = env.child();
    for pair in bindings.chunks(2) {
        let name = match &pair[0] {
            Value::Symbol(sym) => sym.clone(),
            other => {
                return Err(Error::syntax(
                    "let*",
                    format!("binding name must be a symbol, got {}", other.type_name()),
                ));
            }
        };
        let value = eval(&pair[1], &scope)?;
        scope.define(name, value);
    }

    Ok(Step::TailCall(args[1].clone(), scope))
}

// ============================================================================
// do
// ============================================================================

fn eval_do(args: &[Value], env: &Env) -> Result<Step> {
    let Some((last, init)) = args.split_last() else {
        return Err(Error::arity_at_least_named("do", 1, 0));
    };
    for form in init {
        eval(form, env)?;
    }
    Ok(Step::TailCall(last.clone(), env.clone()))
}

// ============================================================================
// if
// ============================================================================

fn eval_if(args: &[Value], env: &Env) -> Result<Step> {
    if !(2..=3).contains(&args.len()) {
        return Err(Error::arity_range_named("if", 2, 3, args.len()));
    }
    let condition = eval(&args[0], env)?;
    if condition.is_truthy() {
        Ok(Step::TailCall(args[1].clone(), env.clone()))
    } else if let Some(else_branch) = args.get(2) {
        Ok(Step::TailCall(else_branch.clone(), env.clone()))
    } else {
        Ok(Step::Return(Value::Nil))
    }
}

// ============================================================================
// fn*
// ============================================================================

fn eval_fn(args: &[Value], env: &Env) -> Result<Step> {
    if args.len() != 2 {
        return Err(Error::arity_named("fn*", 2, args.len()));
    }
    let (params, rest_param) = parse_params(&args[0])?;
    let closure = Closure::new(params, rest_param, args[1].clone(), env.to_any());
    Ok(Step::Return(Value::Closure(closure)))
}

/// Split a parameter list into fixed names and an optional rest name.
///
/// `&` may appear once and must be followed by exactly one name.
fn parse_params(form: &Value) -> Result<(Vec<Symbol>, Option<Symbol>)> {
    let items = form.as_sequence().ok_or_else(|| {
        Error::syntax(
            "fn*",
            format!(
                "parameters must be a list or vector, got {}",
                form.type_name()
            ),
        )
    })?;

    let mut names = Vec::with_capacity(items.len());
    for item in items.iter() {
        match item {
            Value::Symbol(sym) => names.push(sym.clone()),
            other => {
                return Err(Error::syntax(
                    "fn*",
                    format!("parameters must be symbols, got {}", other.type_name()),
                ));
            }
        }
    }

    let Some(marker) = names.iter().position(Symbol::is_rest_marker) else {
        return Ok((names, None));
    };

    let after = &names[marker + 1..];
    if after.len() != 1 || after[0].is_rest_marker() {
        return Err(Error::syntax(
            "fn*",
            "'&' must be followed by exactly one parameter name",
        ));
    }
    let rest = after[0].clone();
    names.truncate(marker);
    Ok((names, Some(rest)))
}
