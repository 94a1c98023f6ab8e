// malt-reader - Value types for malt
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for malt.
//!
//! `Value` is the closed tagged union every stage of the pipeline works with.
//! Everything except [`Atom`] is immutable once built; aggregates use
//! persistent collections so cloning a value is cheap.

use std::any::Any;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use im::{OrdMap, Vector};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::keyword::Keyword;
use crate::printer::pr_str;
use crate::stack::ensure_sufficient_stack;
use crate::symbol::Symbol;

/// The core value type for malt.
///
/// Scalars, sequences and maps compare and hash structurally, with the variant
/// tag taking part (a list never equals a vector under `==`, a symbol never
/// equals a keyword). Functions and atoms compare and hash by identity.
///
/// Integers that fit in an `i64` are always `Int`; `BigInt` only holds values
/// outside that range. Use [`Value::bigint`] to keep that invariant.
pub enum Value {
    /// The nil value
    Nil,
    /// Boolean true or false
    Bool(bool),
    /// Integer in the `i64` range
    Int(i64),
    /// Integer outside the `i64` range
    BigInt(Rc<BigInt>),
    /// Immutable string
    String(Rc<str>),
    /// Symbol, resolved through the environment when evaluated
    Symbol(Symbol),
    /// Keyword, self-evaluating
    Keyword(Keyword),
    /// List (persistent, structural sharing)
    List(Vector<Value>),
    /// Vector (persistent, structural sharing)
    Vector(Vector<Value>),
    /// Hash map with a fixed, sorted iteration order
    Map(OrdMap<Value, Value>),
    /// Native (Rust) function
    NativeFn(NativeFn),
    /// User-defined function
    Closure(Closure),
    /// Mutable single-slot reference cell
    Atom(Atom),
}

// ============================================================================
// Function Types
// ============================================================================

/// A native (Rust) function.
///
/// The callable is type-erased because its signature mentions the runtime's
/// error type; `malt-core` downcasts it when applying.
#[derive(Clone)]
pub struct NativeFn {
    name: &'static str,
    func: Rc<dyn Any>,
}

impl NativeFn {
    /// Create a native function from a type-erased callable.
    pub fn new(name: &'static str, func: Rc<dyn Any>) -> Self {
        NativeFn { name, func }
    }

    /// Get the name the function was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the inner function reference.
    pub fn func(&self) -> &Rc<dyn Any> {
        &self.func
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.func) as *const () as usize
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<native-fn {}>", self.name)
    }
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for NativeFn {}

/// A user-defined function (closure).
///
/// Holds the parameter names, an optional rest parameter, the body and the
/// environment that was active when `fn*` ran. The environment type lives in
/// `malt-core`, so it is stored type-erased.
#[derive(Clone)]
pub struct Closure {
    inner: Rc<ClosureInner>,
}

struct ClosureInner {
    params: Vec<Symbol>,
    rest_param: Option<Symbol>,
    body: Value,
    env: Rc<dyn Any>,
}

impl Closure {
    /// Create a new closure.
    pub fn new(
        params: Vec<Symbol>,
        rest_param: Option<Symbol>,
        body: Value,
        env: Rc<dyn Any>,
    ) -> Self {
        Closure {
            inner: Rc::new(ClosureInner {
                params,
                rest_param,
                body,
                env,
            }),
        }
    }

    /// Fixed parameters, in order.
    pub fn params(&self) -> &[Symbol] {
        &self.inner.params
    }

    /// The parameter following `&`, if any.
    pub fn rest_param(&self) -> Option<&Symbol> {
        self.inner.rest_param.as_ref()
    }

    /// The body expression.
    pub fn body(&self) -> &Value {
        &self.inner.body
    }

    /// The captured environment (type-erased).
    pub fn env(&self) -> &Rc<dyn Any> {
        &self.inner.env
    }

    /// Check if this closure can accept the given number of arguments.
    pub fn accepts(&self, arg_count: usize) -> bool {
        if self.inner.rest_param.is_some() {
            arg_count >= self.inner.params.len()
        } else {
            arg_count == self.inner.params.len()
        }
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<function>")
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Closure {}

// ============================================================================
// Atom Type
// ============================================================================

/// A mutable single-slot reference, the only mutable value kind.
///
/// Clones share the slot, so every holder observes a `reset`. Equality is by
/// identity of the slot, never by its contents.
#[derive(Clone)]
pub struct Atom {
    value: Rc<RefCell<Value>>,
}

impl Atom {
    /// Create an atom holding `value`.
    pub fn new(value: Value) -> Self {
        Atom {
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Get the current value.
    pub fn deref(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Replace the current value, returning the new one.
    pub fn reset(&self, new_val: Value) -> Value {
        *self.value.borrow_mut() = new_val.clone();
        new_val
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.value) as usize
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pr_str(&Value::Atom(self.clone()), true))
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl Eq for Atom {}

// ============================================================================
// Constructors and accessors
// ============================================================================

impl Value {
    /// Create a nil value
    pub fn nil() -> Self {
        Value::Nil
    }

    /// Create a boolean value
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create an integer value
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create an integer from a `BigInt`, demoting to `Int` when it fits.
    pub fn bigint(n: BigInt) -> Self {
        match n.to_i64() {
            Some(small) => Value::Int(small),
            None => Value::BigInt(Rc::new(n)),
        }
    }

    /// Create a string value
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    /// Create a symbol value
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    /// Create a keyword value (name without the colon)
    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Keyword::new(name))
    }

    /// Create an empty list
    pub fn empty_list() -> Self {
        Value::List(Vector::new())
    }

    /// Create a list from elements
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(elements.into_iter().collect())
    }

    /// Create a vector from elements
    pub fn vector(elements: Vec<Value>) -> Self {
        Value::Vector(elements.into_iter().collect())
    }

    /// Create a map from key/value pairs. Later duplicates win.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs.into_iter().collect())
    }

    /// Create a map from alternating keys and values.
    ///
    /// Returns `None` when `items` has odd length.
    pub fn map_from_flat(items: Vec<Value>) -> Option<Self> {
        if items.len() % 2 != 0 {
            return None;
        }
        let mut map = OrdMap::new();
        let mut iter = items.into_iter();
        while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
            map.insert(k, v);
        }
        Some(Value::Map(map))
    }

    /// Create an atom holding `value`
    pub fn atom(value: Value) -> Self {
        Value::Atom(Atom::new(value))
    }

    /// Check if this value is nil
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check if this value is truthy (not nil and not false)
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Elements of a list or vector.
    pub fn as_sequence(&self) -> Option<&Vector<Value>> {
        match self {
            Value::List(items) | Value::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::BigInt(_) => "integer",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "hash-map",
            Value::NativeFn(_) | Value::Closure(_) => "function",
            Value::Atom(_) => "atom",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

// ============================================================================
// Display implementation
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pr_str(self, true))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// ============================================================================
// Equality and ordering (for use as map keys)
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Vector(a), Value::Vector(b)) => {
                ensure_sufficient_stack(|| a == b)
            }
            (Value::Map(a), Value::Map(b)) => ensure_sufficient_stack(|| a == b),
            (Value::NativeFn(a), Value::NativeFn(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        fn type_order(v: &Value) -> u8 {
            match v {
                Value::Nil => 0,
                Value::Bool(_) => 1,
                Value::Int(_) | Value::BigInt(_) => 2,
                Value::String(_) => 3,
                Value::Symbol(_) => 4,
                Value::Keyword(_) => 5,
                Value::List(_) => 6,
                Value::Vector(_) => 7,
                Value::Map(_) => 8,
                Value::NativeFn(_) => 9,
                Value::Closure(_) => 10,
                Value::Atom(_) => 11,
            }
        }

        let ta = type_order(self);
        let tb = type_order(other);
        if ta != tb {
            return ta.cmp(&tb);
        }

        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::BigInt(b)) => BigInt::from(*a).cmp(b),
            (Value::BigInt(a), Value::Int(b)) => (**a).cmp(&BigInt::from(*b)),
            (Value::BigInt(a), Value::BigInt(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Keyword(a), Value::Keyword(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) | (Value::Vector(a), Value::Vector(b)) => {
                ensure_sufficient_stack(|| a.cmp(b))
            }
            (Value::Map(a), Value::Map(b)) => ensure_sufficient_stack(|| a.iter().cmp(b.iter())),
            (Value::NativeFn(a), Value::NativeFn(b)) => a.addr().cmp(&b.addr()),
            (Value::Closure(a), Value::Closure(b)) => a.addr().cmp(&b.addr()),
            (Value::Atom(a), Value::Atom(b)) => a.addr().cmp(&b.addr()),
            _ => Ordering::Equal,
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::BigInt(n) => n.hash(state),
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Keyword(kw) => kw.hash(state),
            Value::List(items) | Value::Vector(items) => {
                ensure_sufficient_stack(|| items.hash(state))
            }
            Value::Map(map) => ensure_sufficient_stack(|| {
                for (k, v) in map.iter() {
                    k.hash(state);
                    v.hash(state);
                }
            }),
            // Identity-compared kinds hash by address
            Value::NativeFn(nf) => nf.addr().hash(state),
            Value::Closure(c) => c.addr().hash(state),
            Value::Atom(a) => a.addr().hash(state),
        }
    }
}

// ============================================================================
// Clone and Drop
// ============================================================================

// Short lists store their elements inline, so cloning or dropping one visits
// every nested level. Both go through the stack guard per aggregate.

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Nil => Value::Nil,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(n) => Value::Int(*n),
            Value::BigInt(n) => Value::BigInt(Rc::clone(n)),
            Value::String(s) => Value::String(Rc::clone(s)),
            Value::Symbol(sym) => Value::Symbol(sym.clone()),
            Value::Keyword(kw) => Value::Keyword(kw.clone()),
            Value::List(items) => Value::List(ensure_sufficient_stack(|| items.clone())),
            Value::Vector(items) => Value::Vector(ensure_sufficient_stack(|| items.clone())),
            Value::Map(map) => Value::Map(ensure_sufficient_stack(|| map.clone())),
            Value::NativeFn(nf) => Value::NativeFn(nf.clone()),
            Value::Closure(c) => Value::Closure(c.clone()),
            Value::Atom(a) => Value::Atom(a.clone()),
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        match self {
            Value::List(items) | Value::Vector(items) if !items.is_empty() => {
                let items = std::mem::take(items);
                ensure_sufficient_stack(move || drop(items));
            }
            Value::Map(map) if !map.is_empty() => {
                let map = std::mem::take(map);
                ensure_sufficient_stack(move || drop(map));
            }
            _ => {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
