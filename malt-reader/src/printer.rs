// malt-reader - Printer for malt values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Renders values back to text.
//!
//! Readable output re-parses to an equal value for everything except
//! functions and atoms, which print as opaque placeholders.

use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// Render `value` as text.
///
/// With `readable` set, strings are quoted and `"`, newline and `\` are
/// escaped. Otherwise string contents are written as-is.
pub fn pr_str(value: &Value, readable: bool) -> String {
    let mut printer = Printer::new(readable);
    printer.write_value(value);
    printer.out
}

/// Render each value and join the results with `sep`.
pub fn pr_seq<'a>(
    values: impl IntoIterator<Item = &'a Value>,
    readable: bool,
    sep: &str,
) -> String {
    let mut printer = Printer::new(readable);
    for (i, v) in values.into_iter().enumerate() {
        if i > 0 {
            printer.out.push_str(sep);
        }
        printer.write_value(v);
    }
    printer.out
}

/// Escape a string for readable output (without the surrounding quotes).
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

struct Printer {
    out: String,
    readable: bool,
    /// Atoms whose contents are being written further up. An atom met again
    /// while open is a cycle and prints as `(atom ...)`.
    open_atoms: Vec<usize>,
}

impl Printer {
    fn new(readable: bool) -> Self {
        Printer {
            out: String::new(),
            readable,
            open_atoms: Vec::new(),
        }
    }

    fn write_value(&mut self, value: &Value) {
        ensure_sufficient_stack(|| self.write_value_inner(value))
    }

    fn write_value_inner(&mut self, value: &Value) {
        match value {
            Value::Nil => self.out.push_str("nil"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Int(n) => self.out.push_str(&n.to_string()),
            Value::BigInt(n) => self.out.push_str(&n.to_string()),
            Value::String(s) => {
                if self.readable {
                    self.out.push('"');
                    self.out.push_str(&escape_string(s));
                    self.out.push('"');
                } else {
                    self.out.push_str(s);
                }
            }
            Value::Symbol(sym) => self.out.push_str(sym.name()),
            Value::Keyword(kw) => {
                self.out.push(':');
                self.out.push_str(kw.name());
            }
            Value::List(items) => self.write_seq(items.iter(), '(', ')'),
            Value::Vector(items) => self.write_seq(items.iter(), '[', ']'),
            Value::Map(map) => {
                self.out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        self.out.push(' ');
                    }
                    self.write_value(k);
                    self.out.push(' ');
                    self.write_value(v);
                }
                self.out.push('}');
            }
            Value::NativeFn(nf) => {
                self.out.push_str("#<native-fn ");
                self.out.push_str(nf.name());
                self.out.push('>');
            }
            Value::Closure(_) => self.out.push_str("#<function>"),
            Value::Atom(atom) => {
                let addr = atom.addr();
                if self.open_atoms.contains(&addr) {
                    self.out.push_str("(atom ...)");
                    return;
                }
                self.open_atoms.push(addr);
                self.out.push_str("(atom ");
                self.write_value(&atom.deref());
                self.out.push(')');
                self.open_atoms.pop();
            }
        }
    }

    fn write_seq<'a>(&mut self, items: impl Iterator<Item = &'a Value>, open: char, close: char) {
        self.out.push(open);
        for (i, item) in items.enumerate() {
            if i > 0 {
                self.out.push(' ');
            }
            self.write_value(item);
        }
        self.out.push(close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::read_str;
    use crate::value::Atom;

    #[test]
    fn test_scalars() {
        assert_eq!(pr_str(&Value::Nil, true), "nil");
        assert_eq!(pr_str(&Value::Bool(false), true), "false");
        assert_eq!(pr_str(&Value::int(-5), true), "-5");
        assert_eq!(pr_str(&Value::symbol("abc"), true), "abc");
        assert_eq!(pr_str(&Value::keyword("kw"), true), ":kw");
    }

    #[test]
    fn test_string_readable_vs_raw() {
        let s = Value::string("a\"b\nc\\d");
        assert_eq!(pr_str(&s, true), r#""a\"b\nc\\d""#);
        assert_eq!(pr_str(&s, false), "a\"b\nc\\d");
    }

    #[test]
    fn test_collections() {
        let v = read_str("(1 [2 3] {:a \"x\"})").unwrap();
        assert_eq!(pr_str(&v, true), "(1 [2 3] {:a \"x\"})");
        assert_eq!(pr_str(&v, false), "(1 [2 3] {:a x})");
        assert_eq!(pr_str(&Value::empty_list(), true), "()");
    }

    #[test]
    fn test_atom() {
        let a = Value::atom(Value::string("s"));
        assert_eq!(pr_str(&a, true), "(atom \"s\")");
    }

    #[test]
    fn test_self_referential_atom() {
        let a = Atom::new(Value::Nil);
        a.reset(Value::list(vec![Value::Atom(a.clone()), Value::int(1)]));
        assert_eq!(pr_str(&Value::Atom(a.clone()), true), "(atom ((atom ...) 1))");

        // Two separate references to a non-cyclic atom both print in full
        let b = Value::atom(Value::int(2));
        let pair = Value::vector(vec![b.clone(), b]);
        assert_eq!(pr_str(&pair, true), "[(atom 2) (atom 2)]");

        a.reset(Value::Nil);
    }

    #[test]
    fn test_deeply_nested_list() {
        let depth = 100_000;
        let mut v = Value::Nil;
        for _ in 0..depth {
            v = Value::list(vec![v]);
        }
        let text = pr_str(&v, true);
        assert_eq!(text.len(), depth * 2 + 3);
        assert!(text.starts_with("((((nil"));
    }

    #[test]
    fn test_pr_seq() {
        let items = vec![Value::int(1), Value::string("x")];
        assert_eq!(pr_seq(&items, true, " "), "1 \"x\"");
        assert_eq!(pr_seq(&items, false, ""), "1x");
    }

    #[test]
    fn test_round_trip_escapes() {
        let s = Value::string("quote\" newline\n backslash\\");
        assert_eq!(read_str(&pr_str(&s, true)).unwrap(), s);
    }
}
