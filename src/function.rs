use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Unwind};
use crate::interpreter::Interpreter;
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionData;
use crate::token::{Location, Token, Type};

fn this_token() -> Token {
    Token::new(Type::This, "this".to_string(), None, Location::new(0))
}

/// A user-defined function or method, closed over the environment in
/// which it was declared.
#[derive(Debug, Clone)]
pub struct Function {
    pub declaration: Rc<FunctionData>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(declaration: Rc<FunctionData>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Returns a copy of this function whose closure additionally binds
    /// `this` to `instance`, one scope out from the function's own
    /// closure. Used when a method is looked up off an instance.
    pub fn bind(&self, instance: Object) -> Function {
        let mut env = Environment::new(Some(Rc::clone(&self.closure)));
        env.define("this", instance);

        Function {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, arg);
        }

        let result = interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment)));

        match result {
            Ok(()) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &this_token())
                } else {
                    Ok(Object::from(Literal::Nil))
                }
            }
            Err(Unwind::Return(value)) => {
                if self.is_initializer {
                    self.closure.borrow().get_at(0, &this_token())
                } else {
                    Ok(value)
                }
            }
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<func '{}'>", self.declaration.name.lexeme)
    }
}

/// A function implemented in Rust and exposed to NEX source, such as
/// `clock`.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub function: fn(&mut Interpreter, Vec<Object>) -> Result<Object, RuntimeError>,
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
    /// The natives bound into every fresh global environment.
    pub fn globals() -> Vec<NativeFunction> {
        vec![NativeFunction {
            name: "clock".to_string(),
            arity: 0,
            function: |_, _| {
                let secs = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs_f64();
                Ok(Object::from(secs))
            },
        }]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native func '{}'>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native func '{}'>", self.name)
    }
}
