use crate::token::{Token, Type};

static mut HAD_ERROR: bool = false;
static mut HAD_RUNTIME_ERROR: bool = false;

/// Checks if a scan, parse, or resolve error occurred.
pub fn did_error() -> bool {
    unsafe { HAD_ERROR }
}

/// Checks if a runtime error occurred.
pub fn did_runtime_error() -> bool {
    unsafe { HAD_RUNTIME_ERROR }
}

/// Clears both flags. The REPL calls this between lines.
pub fn reset_error() {
    unsafe {
        HAD_ERROR = false;
        HAD_RUNTIME_ERROR = false;
    }
}

/// Every diagnostic type implements this: print the message, flip the
/// relevant process-scoped flag.
pub trait Error {
    fn throw(&self);
}

/// A malformed lexeme. Scanning continues at the next character.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        eprintln!("[line {}] Error: {}", self.line, self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// A syntactic fault. The parser synchronizes and keeps going.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        report(self.token.line(), &where_clause(&self.token), &self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// A static-semantic fault caught by the resolver. The resolver never stops.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        report(self.token.line(), &where_clause(&self.token), &self.message);
        unsafe {
            HAD_ERROR = true;
        }
    }
}

/// A type mismatch, undefined name, or callability/arity fault discovered
/// while evaluating. Aborts the current top-level statement.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self) {
        eprintln!("{}\n[line {}]", self.message, self.token.line());
        unsafe {
            HAD_RUNTIME_ERROR = true;
        }
    }
}

fn where_clause(token: &Token) -> String {
    if token.r#type == Type::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

fn report(line: usize, r#where: &str, message: &str) {
    eprintln!("[line {line}] Error{where}: {message}");
}
