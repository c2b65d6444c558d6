use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::{Error, ScanError};
use crate::token::{Literal, Location, Token, Type};

pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<std::str::Chars<'a>>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    start_column: usize,
}

impl<'a> Scanner<'a> {
    /// `start_line` is the line number the scanner's first character is
    /// considered to sit on. A one-shot caller (the `tokenize`/`parse` CLI
    /// commands, or a test scanning a single snippet) always passes `1`.
    /// A caller that scans multiple chunks of source against one persistent
    /// session (the REPL, via `Lox::run`) instead threads each call's
    /// [`Scanner::next_start_line`] into the next call's `start_line`, so
    /// that no two tokens scanned across the whole session ever land on the
    /// same line — which in turn keeps every `Location` (and so every
    /// `Token`, used as the resolver's side-table key) unique across calls,
    /// not just within one.
    pub fn new(source: &'a str, start_line: usize) -> Scanner<'a> {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: start_line,
            column: 0,
            start_column: 0,
        }
    }

    /// Scans the whole source and returns its tokens, always EOF-terminated.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_column = self.column;
            self.scan_token();
        }

        self.tokens.push(Token::new(
            Type::EOF,
            String::new(),
            None,
            Location::new(self.line, self.column),
        ));

        std::mem::take(&mut self.tokens)
    }

    /// The line number a subsequent scan should start at to guarantee it
    /// never reuses a line this scan already produced a token on, even if
    /// this scan's source ended mid-line.
    pub fn next_start_line(&self) -> usize {
        self.line + 1
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("advance past end of source");
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&mut self) -> char {
        self.chars.peek().copied().unwrap_or('\0')
    }

    fn peek_next(&mut self) -> char {
        self.chars.peek_next().copied().unwrap_or('\0')
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> String {
        self.source.substring(self.start, self.current).to_string()
    }

    fn add_token(&mut self, r#type: Type, literal: Option<Literal>) {
        self.tokens.push(Token::new(
            r#type,
            self.lexeme(),
            literal,
            Location::new(self.line, self.start_column),
        ));
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
                self.column = 0;
            }
            self.advance();
        }

        if self.is_at_end() {
            ScanError {
                line: self.line,
                message: "Unterminated string.".to_string(),
            }.throw();
            return;
        }

        self.advance(); // closing quote

        let value = self.source.substring(self.start + 1, self.current - 1).to_string();
        self.add_token(Type::String, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // the '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.lexeme().parse().expect("scanned number to be valid");
        self.add_token(Type::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.lexeme();
        let r#type = match text.as_str() {
            "and" => Type::And,
            "break" => Type::Break,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(r#type, None);
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(Type::LeftParen, None),
            ')' => self.add_token(Type::RightParen, None),
            '{' => self.add_token(Type::LeftBrace, None),
            '}' => self.add_token(Type::RightBrace, None),
            ',' => self.add_token(Type::Comma, None),
            '.' => self.add_token(Type::Dot, None),
            '-' => self.add_token(Type::Minus, None),
            '+' => self.add_token(Type::Plus, None),
            ';' => self.add_token(Type::Semicolon, None),
            '*' => self.add_token(Type::Star, None),

            '!' => {
                let r#type = if self.match_next('=') { Type::BangEqual } else { Type::Bang };
                self.add_token(r#type, None);
            },
            '=' => {
                let r#type = if self.match_next('=') { Type::EqualEqual } else { Type::Equal };
                self.add_token(r#type, None);
            },
            '<' => {
                let r#type = if self.match_next('=') { Type::LessEqual } else { Type::Less };
                self.add_token(r#type, None);
            },
            '>' => {
                let r#type = if self.match_next('=') { Type::GreaterEqual } else { Type::Greater };
                self.add_token(r#type, None);
            },
            '/' => {
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Type::Slash, None);
                }
            },

            ' ' | '\r' | '\t' => {},

            '\n' => {
                self.line += 1;
                self.column = 0;
            },

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            other => {
                ScanError {
                    line: self.line,
                    message: format!("Unexpected character: {other}"),
                }.throw();
            },
        }
    }
}
