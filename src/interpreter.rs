use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{Error, RuntimeError};
use crate::expr::{Expr, ExprVisitor};
use crate::function::{Function, NativeFunction};
use crate::object::{Callable, Object};
use crate::stmt::{Stmt, StmtVisitor};
use crate::token::{Literal, Token, Type};

/// A non-local control transfer raised while executing a statement.
/// `Return`/`Break` are not errors — the resolver guarantees they are always
/// caught by an enclosing function/loop boundary before they could escape to
/// `interpret`'s top level. `Error` is the one outcome that does escape: an
/// uncaught runtime fault aborts the current top-level statement.
pub enum Unwind {
    Return(Object),
    Break,
    Error(RuntimeError),
}

/// Walks the AST, evaluating expressions and executing statements against a
/// chain of environments. Holds the globals frame separately from the
/// "current" frame so native functions and top-level declarations always
/// have a stable home regardless of how deep the current call stack is.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<Token, usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));

        for native in NativeFunction::globals() {
            let name = native.name.lexeme.clone();
            globals.borrow_mut().define(&name, Object::from(native));
        }

        Interpreter {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
        }
    }

    /// Records that `name` (a `Variable`/`Assign`/`This`/`Super` expression's
    /// token) should be looked up `depth` scopes out from wherever it's
    /// evaluated. Called once per resolved occurrence by the resolver.
    pub fn resolve(&mut self, name: &Token, depth: usize) {
        self.locals.insert(name.clone(), depth);
    }

    /// Runs a program to completion. An uncaught runtime error is reported
    /// and stops execution of the remaining top-level statements; it never
    /// panics the process.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(Unwind::Error(error)) = self.execute(statement) {
                error.throw();
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        stmt.accept(self)
    }

    /// Executes `statements` inside `environment`, restoring the previous
    /// current-environment pointer on every exit path — normal completion,
    /// an error, or an unwinding `return`/`break`.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let result = statements.iter().try_for_each(|statement| self.execute(statement));

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    fn lookup_variable(&self, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(name) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok((*l, *r)),
            _ => Err(RuntimeError {
                token: operator.clone(),
                message: "Operands must be numbers.".to_string(),
            }),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Literal(literal) = expr else { unreachable!() };
        Ok(Object::from(literal.clone()))
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Grouping(data) = expr else { unreachable!() };
        self.evaluate(&data.expr)
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Unary(data) = expr else { unreachable!() };
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => match right {
                Object::Literal(Literal::Number(n)) => Ok(Object::from(-n)),
                _ => Err(RuntimeError {
                    token: data.operator.clone(),
                    message: "Operand must be a number.".to_string(),
                }),
            },
            Type::Bang => Ok(Object::from(!right.is_truthy())),
            _ => unreachable!(),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Binary(data) = expr else { unreachable!() };
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let operator = &data.operator;

        match operator.r#type {
            Type::Plus => match (left, right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok(Object::from(l + r)),
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => Ok(Object::from(l + &r)),
                _ => Err(RuntimeError {
                    token: operator.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::Minus => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l - r)),
            Type::Star => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l * r)),
            Type::Slash => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l / r)),
            Type::Greater => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l > r)),
            Type::GreaterEqual => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l >= r)),
            Type::Less => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l < r)),
            Type::LessEqual => Self::number_operands(operator, &left, &right).map(|(l, r)| Object::from(l <= r)),
            // `Object`'s `PartialEq` for literals delegates to `token::Literal`, which
            // already treats `NaN == NaN` as true and never coerces across types.
            Type::EqualEqual => Ok(Object::from(left == right)),
            Type::BangEqual => Ok(Object::from(left != right)),
            _ => unreachable!(),
        }
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Logical(data) = expr else { unreachable!() };
        let left = self.evaluate(&data.left)?;

        match data.operator.r#type {
            Type::Or if left.is_truthy() => return Ok(left),
            Type::And if !left.is_truthy() => return Ok(left),
            Type::Or | Type::And => {},
            _ => unreachable!(),
        }

        self.evaluate(&data.right)
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Variable(data) = expr else { unreachable!() };
        self.lookup_variable(&data.name)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Assign(data) = expr else { unreachable!() };
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.name) {
            Some(&distance) => self.environment.borrow_mut().assign_at(distance, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Call(data) = expr else { unreachable!() };
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(function) => function.arity(),
            Object::Class(class) => class.borrow().arity(),
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "Can only call functions and classes.".to_string(),
                });
            },
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("Expected {} arguments but got {}.", arity, arguments.len()),
            });
        }

        match callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(function) => function.call(self, arguments),
            Object::Class(class) => Class::instantiate(&class, self, arguments),
            _ => unreachable!(),
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Get(data) = expr else { unreachable!() };
        let object = self.evaluate(&data.object)?;

        match &object {
            Object::Instance(instance) => instance.borrow().get(&data.name, &object),
            _ => Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have properties.".to_string(),
            }),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Set(data) = expr else { unreachable!() };
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = &object else {
            return Err(RuntimeError {
                token: data.name.clone(),
                message: "Only instances have fields.".to_string(),
            });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::This(data) = expr else { unreachable!() };
        self.lookup_variable(&data.keyword)
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Super(data) = expr else { unreachable!() };

        let distance = *self.locals.get(&data.keyword).expect("resolver always resolves 'super'");
        let superclass = self.environment.borrow().get_at(distance, &Token::from("super"))?;
        let Object::Class(superclass) = superclass else {
            unreachable!("'super' always binds to a class value");
        };

        // `this` lives one scope nearer than `super`, since the resolver pushes
        // the `super` scope first and the `this` scope second around every
        // subclass method (see `resolver.rs::visit_class_stmt`).
        let instance = self.environment.borrow().get_at(distance - 1, &Token::from("this"))?;

        let method = superclass.borrow().find_method(&data.method.lexeme).ok_or_else(|| RuntimeError {
            token: data.method.clone(),
            message: format!("Undefined property '{}'.", data.method.lexeme),
        })?;

        Ok(Object::from(method.bind(instance)))
    }
}

impl StmtVisitor<Result<(), Unwind>> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expr).map_err(Unwind::Error)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expr).map_err(Unwind::Error)?;
        println!("{value}");
        Ok(())
    }

    fn visit_var_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Var(data) = stmt else { unreachable!() };
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer).map_err(Unwind::Error)?,
            None => Object::Literal(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let environment = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, environment)
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::If(data) = stmt else { unreachable!() };
        let condition = self.evaluate(&data.condition).map_err(Unwind::Error)?;

        if condition.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition).map_err(Unwind::Error)?.is_truthy() {
            match self.execute(&data.body) {
                Ok(()) => {},
                Err(Unwind::Break) => break,
                Err(other) => return Err(other),
            }
        }

        Ok(())
    }

    fn visit_break_stmt(&mut self, _stmt: &Stmt) -> Result<(), Unwind> {
        Err(Unwind::Break)
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Function(data) = stmt else { unreachable!() };
        let function = Function::new(data.name.clone(), data.params.clone(), data.body.clone(), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Return(data) = stmt else { unreachable!() };
        let value = match &data.value {
            Some(value) => self.evaluate(value).map_err(Unwind::Error)?,
            None => Object::Literal(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = match &data.superclass {
            Some(superclass_expr) => {
                let value = self.evaluate(superclass_expr).map_err(Unwind::Error)?;
                match value {
                    Object::Class(class) => Some(class),
                    _ => {
                        let Expr::Variable(variable) = superclass_expr else { unreachable!() };
                        return Err(Unwind::Error(RuntimeError {
                            token: variable.name.clone(),
                            message: "Superclass must be a class.".to_string(),
                        }));
                    },
                }
            },
            None => None,
        };

        // Methods close over a scope wrapping the class's declaration scope that,
        // for subclasses, binds `super` to the superclass. Non-subclasses just
        // reuse the declaration scope directly.
        let method_environment = match &superclass {
            Some(superclass) => {
                let mut scope = Environment::new(Some(Rc::clone(&self.environment)));
                scope.define("super", Object::Class(Rc::clone(superclass)));
                Rc::new(RefCell::new(scope))
            },
            None => Rc::clone(&self.environment),
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let Stmt::Function(function_data) = method else { unreachable!() };
            let is_initializer = function_data.name.lexeme == "init";
            let function = Function::new(
                function_data.name.clone(),
                function_data.params.clone(),
                function_data.body.clone(),
                Rc::clone(&method_environment),
                is_initializer,
            );
            methods.insert(function_data.name.lexeme.clone(), function);
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), superclass, methods)));
        self.environment.borrow_mut().define(&data.name.lexeme, Object::Class(class));

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::expr;
    use crate::token::Location;

    fn token(r#type: Type, lexeme: &str) -> Token {
        Token::new(r#type, lexeme.to_string(), None, Location::new(1, 0))
    }

    #[test]
    fn evaluates_literal() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Literal(Literal::Number(12.0));
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(12.0));
    }

    #[test]
    fn unary_minus_negates_as_f64() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Unary(expr::UnaryData {
            operator: token(Type::Minus, "-"),
            expr: Box::new(Expr::Literal(Literal::Number(12.5))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(-12.5));
    }

    #[test]
    fn unary_bang_negates_truthiness() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Unary(expr::UnaryData {
            operator: token(Type::Bang, "!"),
            expr: Box::new(Expr::Literal(Literal::Nil)),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(true));
    }

    #[test]
    fn adds_numbers_and_concatenates_strings() {
        let mut interpreter = Interpreter::new();

        let numbers = Expr::Binary(expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: token(Type::Plus, "+"),
            right: Box::new(Expr::Literal(Literal::Number(2.0))),
        });
        assert_eq!(interpreter.evaluate(&numbers).unwrap(), Object::from(3.0));

        let strings = Expr::Binary(expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::String("a".into()))),
            operator: token(Type::Plus, "+"),
            right: Box::new(Expr::Literal(Literal::String("b".into()))),
        });
        assert_eq!(interpreter.evaluate(&strings).unwrap(), Object::from("ab"));
    }

    #[test]
    fn adding_string_and_number_is_a_runtime_error() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::String("a".into()))),
            operator: token(Type::Plus, "+"),
            right: Box::new(Expr::Literal(Literal::Number(1.0))),
        });

        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Operands must be two numbers or two strings.");
    }

    #[test]
    fn division_by_zero_yields_nan_not_an_error() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: token(Type::Slash, "/"),
            right: Box::new(Expr::Literal(Literal::Number(0.0))),
        });

        let Object::Literal(Literal::Number(result)) = interpreter.evaluate(&expr).unwrap() else {
            panic!("expected a number");
        };
        assert!(result.is_nan());
    }

    #[test]
    fn nan_equals_nan_is_true() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(f64::NAN))),
            operator: token(Type::EqualEqual, "=="),
            right: Box::new(Expr::Literal(Literal::Number(f64::NAN))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(true));
    }

    #[test]
    fn equality_does_not_coerce_across_types() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(expr::BinaryData {
            left: Box::new(Expr::Literal(Literal::Number(1.0))),
            operator: token(Type::EqualEqual, "=="),
            right: Box::new(Expr::Literal(Literal::String("1".into()))),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(false));
    }

    #[test]
    fn logical_or_short_circuits_on_truthy_left() {
        let mut interpreter = Interpreter::new();
        interpreter.environment.borrow_mut().define("touched", Object::from(false));

        let expr = Expr::Logical(expr::LogicalData {
            left: Box::new(Expr::Literal(Literal::Bool(true))),
            operator: token(Type::Or, "or"),
            right: Box::new(Expr::Assign(expr::AssignData {
                name: Token::from("touched"),
                value: Box::new(Expr::Literal(Literal::Bool(true))),
            })),
        });

        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(true));
        assert_eq!(interpreter.environment.borrow().get(&Token::from("touched")).unwrap(), Object::from(false));
    }

    #[test]
    fn logical_and_short_circuits_on_falsey_left() {
        let mut interpreter = Interpreter::new();
        interpreter.environment.borrow_mut().define("touched", Object::from(false));

        let expr = Expr::Logical(expr::LogicalData {
            left: Box::new(Expr::Literal(Literal::Bool(false))),
            operator: token(Type::And, "and"),
            right: Box::new(Expr::Assign(expr::AssignData {
                name: Token::from("touched"),
                value: Box::new(Expr::Literal(Literal::Bool(true))),
            })),
        });

        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::from(false));
        assert_eq!(interpreter.environment.borrow().get(&Token::from("touched")).unwrap(), Object::from(false));
    }

    #[test]
    fn reading_undefined_global_is_a_runtime_error() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Variable(expr::VariableData { name: Token::from("missing") });
        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Undefined variable 'missing'.");
    }

    #[test]
    fn block_statement_restores_the_enclosing_environment() {
        let mut interpreter = Interpreter::new();
        interpreter.environment.borrow_mut().define("a", Object::from(1.0));

        let block = Stmt::Block(crate::stmt::BlockData {
            statements: vec![Stmt::Var(crate::stmt::VarData {
                name: Token::from("a"),
                initializer: Some(Expr::Literal(Literal::Number(2.0))),
            })],
        });

        interpreter.execute(&block).unwrap();

        assert_eq!(interpreter.environment.borrow().get(&Token::from("a")).unwrap(), Object::from(1.0));
    }

    #[test]
    fn while_loop_stops_on_break_without_propagating() {
        let mut interpreter = Interpreter::new();

        let body = Stmt::Block(crate::stmt::BlockData {
            statements: vec![Stmt::Break(crate::stmt::BreakData { keyword: token(Type::Break, "break") })],
        });

        let while_stmt = Stmt::While(crate::stmt::WhileData {
            condition: Expr::Literal(Literal::Bool(true)),
            body: Box::new(body),
        });

        assert!(interpreter.execute(&while_stmt).is_ok());
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Call(expr::CallData {
            callee: Box::new(Expr::Literal(Literal::Number(1.0))),
            paren: token(Type::RightParen, ")"),
            arguments: vec![],
        });

        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "Can only call functions and classes.");
    }

    #[test]
    fn calling_clock_returns_a_number() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Call(expr::CallData {
            callee: Box::new(Expr::Variable(expr::VariableData { name: Token::from("clock") })),
            paren: token(Type::RightParen, ")"),
            arguments: vec![],
        });

        assert!(matches!(interpreter.evaluate(&expr).unwrap(), Object::Literal(Literal::Number(_))));
    }
}
