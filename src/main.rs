use std::{env, fs, process};

use tlox::ast::ASTPrinter;
use tlox::error;
use tlox::parser::Parser;
use tlox::scanner::Scanner;
use tlox::Lox;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("tokenize") => tokenize(&expect_path(&args)),
        Some("parse") => parse(&expect_path(&args)),
        Some("interpret") => interpret(&expect_path(&args)),
        Some("repl") => repl(),
        _ => usage(),
    }
}

fn usage() -> ! {
    eprintln!("Usage: tlox tokenize|parse|interpret FILE");
    eprintln!("       tlox repl");
    process::exit(64);
}

fn expect_path(args: &[String]) -> String {
    match args.get(2) {
        Some(path) => path.clone(),
        None => usage(),
    }
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).expect("should have been able to read the file")
}

fn tokenize(path: &str) {
    let source = read_source(path);
    let tokens = Scanner::new(&source, 1).scan_tokens();

    for token in &tokens {
        println!("{token}");
    }

    if error::did_error() {
        process::exit(65);
    }
}

fn parse(path: &str) {
    let source = read_source(path);
    let tokens = Scanner::new(&source, 1).scan_tokens();

    if error::did_error() {
        process::exit(65);
    }

    let statements = Parser::new(tokens).parse();

    if error::did_error() {
        process::exit(65);
    }

    let mut printer = ASTPrinter;
    for statement in &statements {
        println!("{}", printer.print_stmt(statement));
    }
}

fn interpret(path: &str) {
    let source = read_source(path);
    let mut lox = Lox::new();
    lox.run(&source);

    if error::did_error() {
        process::exit(65);
    }
    if error::did_runtime_error() {
        process::exit(70);
    }
}

/// Reads lines from standard input, executing each against a persistent
/// interpreter session. History is best-effort: a missing home directory or
/// an unwritable history file never stops the REPL from running.
fn repl() {
    let mut lox = Lox::new();
    let mut editor = rustyline::DefaultEditor::new().expect("should be able to start the line editor");

    let history_path = home::home_dir().map(|home| home.join(".tlox_history"));
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    while let Ok(line) = editor.readline("> ") {
        let _ = editor.add_history_entry(line.as_str());
        lox.run(&line);
        error::reset_error();
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }
}
