// malt-core - I/O built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! I/O operations: pr-str, str, prn, println, read-string, slurp

use std::io::{self, Write};

use malt_reader::{Value, pr_seq, read_str};

use crate::error::{Error, Result};

use super::expect_arity;

/// (pr-str & xs) - readable forms joined with spaces
pub(crate) fn builtin_pr_str(args: &[Value]) -> Result<Value> {
    Ok(Value::string(pr_seq(args, true, " ")))
}

/// (str & xs) - display forms concatenated
pub(crate) fn builtin_str(args: &[Value]) -> Result<Value> {
    Ok(Value::string(pr_seq(args, false, "")))
}

/// (prn & xs) - print readable forms joined with spaces, then a newline
pub(crate) fn builtin_prn(args: &[Value]) -> Result<Value> {
    write_line(&pr_seq(args, true, " "))?;
    Ok(Value::Nil)
}

/// (println & xs) - print display forms joined with spaces, then a newline
pub(crate) fn builtin_println(args: &[Value]) -> Result<Value> {
    write_line(&pr_seq(args, false, " "))?;
    Ok(Value::Nil)
}

fn write_line(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", text)
        .and_then(|()| out.flush())
        .map_err(|e| Error::Internal(format!("failed to write to stdout: {}", e)))
}

/// (read-string s) - read the first form in s
pub(crate) fn builtin_read_string(args: &[Value]) -> Result<Value> {
    expect_arity("read-string", args, 1)?;
    match &args[0] {
        Value::String(s) => Ok(read_str(s)?),
        other => Err(Error::type_error_in(
            "read-string",
            "string",
            other.type_name(),
        )),
    }
}

/// (slurp path) - read a whole file as text
pub(crate) fn builtin_slurp(args: &[Value]) -> Result<Value> {
    expect_arity("slurp", args, 1)?;
    let path = match &args[0] {
        Value::String(s) => s.as_ref(),
        other => return Err(Error::type_error_in("slurp", "string", other.type_name())),
    };

    std::fs::read_to_string(path)
        .map(Value::string)
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_string(),
            },
            _ => Error::FileUnreadable {
                path: path.to_string(),
                message: e.to_string(),
            },
        })
}
