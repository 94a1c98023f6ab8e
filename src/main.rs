// malt - A small Lisp with a tail-call-eliminating evaluator
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use malt_core::{Config, Interpreter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "Usage: malt [--version] [--max-depth N] [--no-prelude] [FILE...]";

/// Parsed command line.
struct Options {
    config: Config,
    files: Vec<String>,
}

fn main() {
    init_tracing();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            process::exit(2);
        }
    };

    let interp = match Interpreter::with_config(options.config) {
        Ok(interp) => interp,
        Err(e) => {
            eprintln!("Failed to load bootstrap library: {}", e);
            process::exit(1);
        }
    };

    // If files provided, evaluate them; otherwise start REPL
    if options.files.is_empty() {
        run_repl(&interp);
    } else {
        run_files(&options.files, &interp);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

/// Map flags onto a [`Config`]. Returns `Ok(None)` when the process should
/// exit without running anything.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>, String> {
    let mut config = Config::default();
    if let Ok(depth) = env::var("MALT_MAX_DEPTH") {
        config = config.with_max_eval_depth(parse_depth(&depth)?);
    }

    let mut files = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("malt v{}", VERSION);
                return Ok(None);
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                return Ok(None);
            }
            "--no-prelude" => config = config.without_prelude(),
            "--max-depth" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--max-depth needs a value".to_string())?;
                config = config.with_max_eval_depth(parse_depth(&value)?);
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{}'", flag));
            }
            _ => files.push(arg),
        }
    }

    Ok(Some(Options { config, files }))
}

fn parse_depth(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Invalid depth limit '{}'", text)),
    }
}

/// Evaluate a sequence of source files
fn run_files(files: &[String], interp: &Interpreter) {
    for file_path in files {
        if let Err(e) = eval_file(file_path, interp) {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

/// Evaluate every form in a single source file
fn eval_file(file_path: &str, interp: &Interpreter) -> Result<(), String> {
    let source =
        fs::read_to_string(file_path).map_err(|e| format!("Error reading '{}': {}", file_path, e))?;
    tracing::debug!(file = file_path, bytes = source.len(), "evaluating file");

    interp
        .eval_all(&source)
        .map(|_| ())
        .map_err(|e| format!("Error in '{}': {}", file_path, e))
}

/// Run the interactive REPL
fn run_repl(interp: &Interpreter) {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("user> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("Read error: {}", e);
                break;
            }
            None => {
                println!();
                break;
            }
        };

        match interp.rep(&line) {
            Ok(output) => println!("{}", output),
            Err(e) if e.is_no_input() => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
