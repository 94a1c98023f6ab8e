// malt-core - Function application
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::any::Any;
use std::rc::Rc;

use im::Vector;
use malt_reader::{Closure, NativeFn, Value};

use super::{Step, eval, eval_items};
use crate::env::Env;
use crate::error::{AritySpec, Error, Result};

/// Type-erased native function signature.
pub(crate) type NativeFnImpl = dyn Fn(&[Value]) -> Result<Value>;

/// Evaluate `(f args...)`. Closure bodies are returned as a tail call.
pub(crate) fn eval_application(items: &Vector<Value>, env: &Env) -> Result<Step> {
    let evaluated = eval_items(items.iter(), env)?;
    let Some((func, args)) = evaluated.split_first() else {
        return Err(Error::Internal("application of an empty list".into()));
    };

    match func {
        Value::NativeFn(native) => Ok(Step::Return(apply_native(native, args)?)),
        Value::Closure(closure) => {
            let fn_env = bind_params(closure, args)?;
            Ok(Step::TailCall(closure.body().clone(), fn_env))
        }
        other => Err(Error::NotCallable(other.to_string())),
    }
}

/// Apply a function value to already-evaluated arguments.
///
/// Used by natives that call back into user code, such as `swap!`.
pub fn apply(func: &Value, args: &[Value]) -> Result<Value> {
    match func {
        Value::NativeFn(native) => apply_native(native, args),
        Value::Closure(closure) => {
            let fn_env = bind_params(closure, args)?;
            eval(closure.body(), &fn_env)
        }
        other => Err(Error::NotCallable(other.to_string())),
    }
}

/// Build the call scope for a closure, chained off its captured environment.
fn bind_params(closure: &Closure, args: &[Value]) -> Result<Env> {
    if !closure.accepts(args.len()) {
        let fixed = closure.params().len();
        let expected = if closure.rest_param().is_some() {
            AritySpec::AtLeast(fixed)
        } else {
            AritySpec::Exact(fixed)
        };
        return Err(Error::ArityError {
            expected,
            got: args.len(),
            name: None,
        });
    }

    let captured = Env::from_any(closure.env())?;
    tracing::trace!(params = closure.params().len(), args = args.len(), "entering closure");

    let mut bindings: Vec<_> = closure
        .params()
        .iter()
        .cloned()
        .zip(args.iter().cloned())
        .collect();
    if let Some(rest) = closure.rest_param() {
        let rest_args = args[closure.params().len()..].to_vec();
        bindings.push((rest.clone(), Value::list(rest_args)));
    }

    Ok(captured.child_with(bindings))
}

/// Apply a native function.
pub(crate) fn apply_native(func: &NativeFn, args: &[Value]) -> Result<Value> {
    // Downcast the function
    let f = func
        .func()
        .downcast_ref::<Rc<NativeFnImpl>>()
        .ok_or_else(|| Error::Internal("Native function has invalid type".into()))?;
    f(args)
}

/// Create a native function value.
pub fn make_native_fn(
    name: &'static str,
    func: impl Fn(&[Value]) -> Result<Value> + 'static,
) -> NativeFn {
    let func_rc: Rc<NativeFnImpl> = Rc::new(func);
    let func_any: Rc<dyn Any> = Rc::new(func_rc);
    NativeFn::new(name, func_any)
}
