use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::interpreter::{Interpreter, Unwind};
use crate::object::{Callable, Object};
use crate::stmt::Stmt;
use crate::token::{Literal, Location, Token, Type};

/// A user-defined function or method, closed over the environment it was
/// declared in. Methods additionally know whether they're `init`, which
/// changes what `call` returns.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(name: Token, params: Vec<Token>, body: Vec<Stmt>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { name, params, body, closure, is_initializer }
    }

    /// Returns a copy of this method with `this` bound to `instance` in a
    /// fresh environment wrapping the method's original closure. Called
    /// once per instance access, not once per class — each bound method is
    /// its own `Function` value so `this` resolves independently.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);

        Function::new(
            self.name.clone(),
            self.params.clone(),
            self.body.clone(),
            Rc::new(RefCell::new(environment)),
            self.is_initializer,
        )
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.body == other.body
            && Rc::ptr_eq(&self.closure, &other.closure)
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        let result = interpreter.execute_block(&self.body, Rc::new(RefCell::new(environment)));

        if self.is_initializer {
            return self.closure.borrow().get_at(0, &Token::from("this"));
        }

        match result {
            Ok(()) => Ok(Object::Literal(Literal::Nil)),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Break) => unreachable!("resolver rejects break outside a loop"),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn arity(&self) -> usize {
        self.params.len()
    }
}

impl From<Stmt> for Function {
    fn from(_value: Stmt) -> Self {
        panic!("a Function must carry its defining closure; construct it with Function::new")
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}

/// A function implemented in Rust rather than Lox, exposed to scripts as an
/// ordinary callable.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: Token,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    /// The global names every interpreter starts with.
    pub fn globals() -> Vec<NativeFunction> {
        vec![
            NativeFunction {
                name: Token::new(Type::Identifier, "clock".to_owned(), None, Location::new(0, 0)),
                arity: 0,
                function: |_, _| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock to be after the unix epoch")
                        .as_secs_f64();
                    Ok(Object::from(now))
                },
            },
            NativeFunction {
                name: Token::new(Type::Identifier, "input".to_owned(), None, Location::new(0, 0)),
                arity: 0,
                function: |_, _| {
                    let mut line = String::new();
                    match std::io::stdin().read_line(&mut line) {
                        Ok(0) => Ok(Object::Literal(Literal::Nil)),
                        Ok(_) => {
                            if line.ends_with('\n') {
                                line.pop();
                                if line.ends_with('\r') {
                                    line.pop();
                                }
                            }
                            Ok(Object::from(line))
                        },
                        Err(_) => Ok(Object::Literal(Literal::Nil)),
                    }
                },
            },
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

#[cfg(test)]
impl Function {
    /// A minimal function value for tests that only care about identity or
    /// method-table presence, not about actually calling it.
    pub fn new_for_test(name: &str) -> Function {
        Function::new(Token::from(name), vec![], vec![], Rc::new(RefCell::new(Environment::default())), false)
    }
}
