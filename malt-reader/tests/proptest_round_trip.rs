// malt-reader - Property-based tests for print/read round-tripping
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for the reader and printer.
//!
//! Any value built from scalars, sequences and maps must read back equal to
//! itself after being printed readably, and equal values must hash equally.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use malt_reader::{BigInt, Value, pr_str, read_str};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn compute_hash(val: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    val.hash(&mut hasher);
    hasher.finish()
}

fn symbol_name() -> impl Strategy<Value = String> {
    "[a-z*+!?<>=][a-z0-9*+!?<>=-]{0,8}"
        .prop_filter("reserved literal", |s| !matches!(s.as_str(), "nil" | "true" | "false"))
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::bool),
        any::<i64>().prop_map(Value::int),
        any::<i128>().prop_map(|n| Value::bigint(BigInt::from(n))),
        "[a-zA-Z0-9 ;,()\\[\\]{}\"\\\\\n]{0,16}".prop_map(|s| Value::string(s.as_str())),
        symbol_name().prop_map(|s| Value::symbol(&s)),
        "[a-z][a-z0-9-]{0,8}".prop_map(|s| Value::keyword(&s)),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::list),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::vector),
            prop::collection::vec((scalar(), inner), 0..4).prop_map(Value::map),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Printing readably then reading gives back an equal value
    #[test]
    fn print_then_read_is_identity(v in value()) {
        let text = pr_str(&v, true);
        let back = read_str(&text).unwrap();
        assert_eq!(back, v, "round trip through {:?}", text);
    }

    /// Reading the same text twice gives equal values with equal hashes
    #[test]
    fn equal_values_hash_equally(v in value()) {
        let text = pr_str(&v, true);
        let a = read_str(&text).unwrap();
        let b = read_str(&text).unwrap();
        assert_eq!(&a, &b);
        assert_eq!(compute_hash(&a), compute_hash(&b));
    }

    /// Ordering agrees with equality
    #[test]
    fn ordering_agrees_with_equality(a in value(), b in value()) {
        assert_eq!(a == b, a.cmp(&b) == std::cmp::Ordering::Equal);
    }

    /// Integers print as plain decimal
    #[test]
    fn integers_print_as_decimal(n in any::<i64>()) {
        assert_eq!(pr_str(&Value::int(n), true), n.to_string());
    }
}
