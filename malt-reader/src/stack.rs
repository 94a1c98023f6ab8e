// malt-reader - Stack growth for deep recursion
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Stack growth for code that recurses once per nesting level.
//!
//! Reading, printing, comparing and dropping a value all walk it recursively,
//! and the evaluator recurses for every non-tail subexpression. Each of those
//! steps runs through [`ensure_sufficient_stack`], which moves onto a freshly
//! allocated stack segment when the current one runs low. Nesting depth is
//! then limited by memory rather than by the thread's stack size.

/// Remaining stack below which the next call switches to a new segment.
const RED_ZONE: usize = 128 * 1024;

/// Size of each additional stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first moving to a new stack segment if the current one is low.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
