// malt-core - Environment for lexical scoping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Environment for variable bindings with lexical scoping.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use malt_reader::{Symbol, Value};

use crate::error::{Error, Result};

/// A lexical environment for variable bindings.
///
/// Environments form a chain through parent references, enabling
/// lexical scoping. Each environment has its own bindings map
/// and optionally a parent environment for outer scope lookup.
/// Closures hold a clone, which keeps the whole chain alive.
///
/// # Examples
///
/// ```
/// use malt_core::Env;
/// use malt_reader::{Symbol, Value};
///
/// let env = Env::new();
/// env.define(Symbol::new("x"), Value::int(42));
///
/// let child = env.child();
/// assert_eq!(child.lookup(&Symbol::new("x")).unwrap(), Value::int(42));
///
/// // Child can shadow parent bindings
/// child.define(Symbol::new("x"), Value::int(100));
/// assert_eq!(child.lookup(&Symbol::new("x")).unwrap(), Value::int(100));
/// assert_eq!(env.lookup(&Symbol::new("x")).unwrap(), Value::int(42));
/// ```
#[derive(Clone)]
pub struct Env {
    inner: Rc<RefCell<EnvInner>>,
}

struct EnvInner {
    bindings: HashMap<Symbol, Value>,
    parent: Option<Env>,
}

/// A non-owning handle to an environment.
///
/// Used by natives that must reach the global environment without the
/// environment owning them back through its own bindings.
#[derive(Clone)]
pub struct WeakEnv {
    inner: Weak<RefCell<EnvInner>>,
}

impl Env {
    /// Create a new root environment with no parent.
    pub fn new() -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// Create a child environment with this environment as parent.
    #[must_use]
    pub fn child(&self) -> Self {
        self.child_with(Vec::new())
    }

    /// Create a child environment pre-populated with `bindings`.
    ///
    /// Later bindings of the same name win.
    #[must_use]
    pub fn child_with(&self, bindings: Vec<(Symbol, Value)>) -> Self {
        Env {
            inner: Rc::new(RefCell::new(EnvInner {
                bindings: bindings.into_iter().collect(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Define a binding in this environment (not parent).
    pub fn define(&self, sym: Symbol, val: Value) {
        self.inner.borrow_mut().bindings.insert(sym, val);
    }

    /// Remove every binding in this environment (not parent).
    pub(crate) fn clear(&self) {
        let bindings = std::mem::take(&mut self.inner.borrow_mut().bindings);
        drop(bindings);
    }

    /// Look up a symbol in this environment or parent chain.
    /// Uses iterative traversal to avoid stack overflow on deep environments.
    pub fn lookup(&self, sym: &Symbol) -> Result<Value> {
        let mut current = self.clone();
        loop {
            let inner = current.inner.borrow();
            if let Some(val) = inner.bindings.get(sym) {
                return Ok(val.clone());
            }
            let parent = inner.parent.clone();
            drop(inner);
            match parent {
                Some(p) => current = p,
                None => return Err(Error::UndefinedSymbol(sym.clone())),
            }
        }
    }

    /// Check if a symbol is defined in this environment or parent chain.
    #[must_use]
    pub fn is_defined(&self, sym: &Symbol) -> bool {
        self.lookup(sym).is_ok()
    }

    /// Get a non-owning handle to this environment.
    #[must_use]
    pub fn downgrade(&self) -> WeakEnv {
        WeakEnv {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Type-erase this environment for storage in a closure.
    pub(crate) fn to_any(&self) -> Rc<dyn Any> {
        Rc::new(self.clone())
    }

    /// Recover an environment stored with [`Env::to_any`].
    pub(crate) fn from_any(env: &Rc<dyn Any>) -> Result<Env> {
        env.downcast_ref::<Env>()
            .cloned()
            .ok_or_else(|| Error::Internal("Function environment has invalid type".into()))
    }
}

impl WeakEnv {
    /// Get the environment back, if it is still alive.
    pub fn upgrade(&self) -> Option<Env> {
        self.inner.upgrade().map(|inner| Env { inner })
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

// Bindings can reach this environment again through closures, so only
// shallow details are shown.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Env")
            .field("bindings", &inner.bindings.len())
            .field("has_parent", &inner.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn test_define_and_lookup() {
        let env = Env::new();
        env.define(sym("x"), Value::int(42));

        assert_eq!(env.lookup(&sym("x")).unwrap(), Value::int(42));
    }

    #[test]
    fn test_undefined_symbol() {
        let env = Env::new();
        let result = env.lookup(&sym("x"));
        assert!(matches!(result, Err(Error::UndefinedSymbol(_))));
    }

    #[test]
    fn test_child_inherits_parent() {
        let parent = Env::new();
        parent.define(sym("x"), Value::int(42));

        let child = parent.child();
        assert_eq!(child.lookup(&sym("x")).unwrap(), Value::int(42));
    }

    #[test]
    fn test_child_shadows_parent() {
        let parent = Env::new();
        parent.define(sym("x"), Value::int(42));

        let child = parent.child();
        child.define(sym("x"), Value::int(100));

        assert_eq!(child.lookup(&sym("x")).unwrap(), Value::int(100));
        assert_eq!(parent.lookup(&sym("x")).unwrap(), Value::int(42));

        drop(child);
        assert_eq!(parent.lookup(&sym("x")).unwrap(), Value::int(42));
    }

    #[test]
    fn test_child_with_bindings() {
        let parent = Env::new();
        parent.define(sym("y"), Value::int(2));

        let child = parent.child_with(vec![(sym("x"), Value::int(1))]);
        assert_eq!(child.lookup(&sym("x")).unwrap(), Value::int(1));
        assert_eq!(child.lookup(&sym("y")).unwrap(), Value::int(2));
        assert!(!parent.is_defined(&sym("x")));
    }

    #[test]
    fn test_is_defined() {
        let env = Env::new();
        assert!(!env.is_defined(&sym("x")));

        env.define(sym("x"), Value::int(42));
        assert!(env.is_defined(&sym("x")));
    }

    #[test]
    fn test_weak_handle() {
        let env = Env::new();
        env.define(sym("x"), Value::int(1));
        let weak = env.downgrade();
        assert_eq!(
            weak.upgrade().unwrap().lookup(&sym("x")).unwrap(),
            Value::int(1)
        );
        drop(env);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_clear_keeps_parent() {
        let parent = Env::new();
        parent.define(sym("x"), Value::int(1));
        let child = parent.child();
        child.define(sym("y"), Value::int(2));
        child.clear();
        assert!(!child.is_defined(&sym("y")));
        assert_eq!(child.lookup(&sym("x")).unwrap(), Value::int(1));
    }

    #[test]
    fn test_any_round_trip() {
        let env = Env::new();
        env.define(sym("x"), Value::int(7));
        let erased = env.to_any();
        let back = Env::from_any(&erased).unwrap();
        assert_eq!(back.lookup(&sym("x")).unwrap(), Value::int(7));
    }

    #[test]
    fn test_deep_chain_lookup() {
        let root = Env::new();
        root.define(sym("x"), Value::int(1));
        let mut env = root.clone();
        for _ in 0..1_000 {
            env = env.child();
        }
        assert_eq!(env.lookup(&sym("x")).unwrap(), Value::int(1));
    }
}
