// malt-reader - Reader, printer and value model for malt
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # malt-reader
//!
//! Value model, reader and printer for the malt language.
//! Produces `Value` trees from source strings and renders them back.

pub mod error;
pub mod keyword;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod stack;
pub mod symbol;
pub mod value;

pub use error::ReadError;
pub use im::{OrdMap, Vector};
pub use keyword::Keyword;
pub use lexer::{Lexer, Token};
pub use num_bigint::BigInt;
pub use num_traits::ToPrimitive;
pub use parser::{Parser, read_all, read_str};
pub use printer::{escape_string, pr_seq, pr_str};
pub use stack::ensure_sufficient_stack;
pub use symbol::Symbol;
pub use value::{Atom, Closure, NativeFn, Value};
