#![allow(clippy::needless_return)]

//! `tlox` is a tree-walking interpreter for Lox, a small dynamically typed
//! scripting language with C-like syntax, lexical scoping, first-class
//! functions with closures, and single-inheritance classes.
//!
//! The interpreter reads source text and executes it directly against an
//! in-memory AST — there is no bytecode or JIT. The pipeline, leaves first:
//!
//! 1. [`scanner`] turns the source string into a token stream.
//! 2. [`parser`] turns the tokens into a list of [`stmt::Stmt`] via
//!    recursive descent.
//! 3. [`resolver`] walks the AST once, annotating every variable-use
//!    expression with the lexical distance to its defining scope, so that
//!    closures capture the frame the language semantics promise rather than
//!    whatever frame happens to be current at call time.
//! 4. [`interpreter`] walks the AST, maintaining a chain of
//!    [`environment::Environment`]s, evaluating expressions into
//!    [`object::Object`] values and executing statements.
//!
//! [`error`] is a process-scoped diagnostic sink shared by all four stages;
//! its `had_error`/`had_runtime_error` flags are what the CLI front end
//! turns into exit codes (scan/parse/resolve faults exit 65, runtime faults
//! exit 70).

use std::fs;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// A persistent interpreter session. Each call to [`Lox::run`] drives the
/// full scan → parse → resolve → interpret pipeline over one chunk of
/// source — a whole file for [`Lox::run_file`], or a single line from the
/// REPL — while sharing the same globals and environment chain across
/// calls, so a `var` or `fun` declared on one line stays visible to the next.
pub struct Lox {
    interpreter: Interpreter,
    /// The line the next [`Lox::run`] call's scan should start counting
    /// from. Each call advances this past every line it used, so that two
    /// tokens scanned on different calls never share a `Location` — the
    /// resolver's side-table key (`Token`, keyed by type/lexeme/location)
    /// would otherwise collide across calls the moment two unrelated
    /// occurrences in two different calls happened to land on the same
    /// `(line, column)`, which is trivial to arrange in a REPL where every
    /// input line restarts at column 0.
    next_line: usize,
}

impl Lox {
    pub fn new() -> Self {
        Lox { interpreter: Interpreter::new(), next_line: 1 }
    }

    /// Reads `path` and runs its contents. Errors are reported through the
    /// [`error`] sink, not a return value; callers check
    /// [`error::did_error`]/[`error::did_runtime_error`] afterwards.
    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path).expect("should have been able to read the file");
        self.run(&contents);
    }

    /// Runs one chunk of source through the pipeline, stopping early if an
    /// earlier stage already reported an error — there is no point parsing
    /// a token stream the scanner already gave up on, and no point
    /// resolving or interpreting a tree the parser couldn't fully build.
    pub fn run(&mut self, source: &str) {
        let mut scanner = Scanner::new(source, self.next_line);
        let tokens = scanner.scan_tokens();
        self.next_line = scanner.next_start_line();

        if error::did_error() {
            return;
        }

        let statements = Parser::new(tokens).parse();

        if error::did_error() {
            return;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements);

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
