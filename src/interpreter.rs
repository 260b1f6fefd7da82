use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, BufRead, Read, Write};
use std::rc::Rc;

use crate::class::Class;
use crate::environment::Environment;
use crate::error::{Error, RuntimeError, Unwind};
use crate::expr::{self, Expr, ExprVisitor, NodeId};
use crate::function::{Function, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::{self, Stmt, StmtVisitor};
use crate::token::{Token, Type};

/// Walks the AST directly, evaluating expressions and executing statements
/// as it goes. Holds the live environment chain, the resolver's locals
/// side table, and the program's input/output streams so that both can be
/// swapped out in tests.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<NodeId, usize>,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_io(Box::new(io::stdout()), Box::new(io::BufReader::new(io::stdin())))
    }

    pub fn with_io(output: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::globals() {
            globals.borrow_mut().define(&native.name.clone(), Object::from(native));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new(), output, input }
    }

    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Error(err)) => {
                    err.throw();
                    return;
                }
                Err(Unwind::Return(_)) => {
                    unreachable!("the resolver rejects a `ret` outside of a function")
                }
            }
        }
    }

    /// Records the scope distance the resolver computed for a node so that
    /// variable reads/writes can skip the dynamic environment walk.
    pub fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Object, Unwind> {
        expr.accept(self)
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), Unwind> {
        stmt.accept(self)
    }

    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> Result<(), Unwind> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn lookup_variable(&self, id: NodeId, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, name),
            None => self.environment.borrow().get(name),
        }
    }

    fn invoke(&mut self, paren: &Token, name: &str, callable: &dyn Callable, arguments: Vec<Object>) -> Result<Object, Unwind> {
        if arguments.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren.clone(),
                format!("'{name}' expected {} arguments but got {}.", callable.arity(), arguments.len()),
            )
            .into());
        }

        Ok(callable.call(self, arguments)?)
    }

    fn number_operands(&self, op: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
        match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => Err(RuntimeError::new(op.clone(), "Operands must be numbers".to_string())),
        }
    }

    /// Reads one whitespace-delimited word from the configured input
    /// stream, skipping leading whitespace. Returns an empty string at EOF.
    ///
    /// Buffers raw bytes and decodes as UTF-8 at the end rather than
    /// converting byte-by-byte, since a multi-byte UTF-8 sequence has no
    /// valid `char` interpretation one byte at a time. ASCII whitespace is
    /// always a single byte and never appears inside a multi-byte
    /// sequence, so splitting on raw bytes is still correct.
    fn read_word(&mut self) -> String {
        let mut buf = Vec::new();

        for byte in (&mut self.input).bytes() {
            let Ok(byte) = byte else { break };

            if byte.is_ascii_whitespace() {
                if buf.is_empty() {
                    continue;
                }
                break;
            }

            buf.push(byte);
        }

        String::from_utf8(buf).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor<Result<Object, Unwind>> for Interpreter {
    fn visit_assign_expr(&mut self, data: &expr::AssignData) -> Result<Object, Unwind> {
        let value = self.evaluate(&data.value)?;

        // An assignment the resolver never bound (always a global, since
        // only nested scopes are tracked) has no effect on the environment;
        // it still evaluates and yields its right-hand side.
        if let Some(&distance) = self.locals.get(&data.id) {
            self.environment.borrow_mut().assign_at(distance, &data.name, value.clone());
        }

        Ok(value)
    }

    fn visit_binary_expr(&mut self, data: &expr::BinaryData) -> Result<Object, Unwind> {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let op = &data.operator;

        Ok(match op.r#type {
            Type::Greater => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                Object::from(l > r)
            }
            Type::GreaterEqual => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                Object::from(l >= r)
            }
            Type::Less => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                Object::from(l < r)
            }
            Type::LessEqual => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                Object::from(l <= r)
            }
            Type::Minus => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                Object::from(l - r)
            }
            Type::Star => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                Object::from(l * r)
            }
            Type::Slash => {
                let (l, r) = self.number_operands(op, &left, &right)?;
                if r == 0.0 {
                    return Err(RuntimeError::new(op.clone(), "Division by zero".to_string()).into());
                }
                Object::from(l / r)
            }
            Type::Plus => match (left.as_number(), right.as_number(), left.as_string(), right.as_string()) {
                (Some(l), Some(r), _, _) => Object::from(l + r),
                (_, _, Some(l), Some(r)) => Object::from(format!("{l}{r}")),
                _ => {
                    return Err(RuntimeError::new(op.clone(), "Operands must be two numbers or two strings".to_string()).into());
                }
            },
            Type::EqualEqual => Object::from(left == right),
            Type::BangEqual => Object::from(left != right),
            _ => unreachable!("parser never emits this token as a binary operator"),
        })
    }

    fn visit_call_expr(&mut self, data: &expr::CallData) -> Result<Object, Unwind> {
        let callee = self.evaluate(&data.callee)?;

        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        match callee {
            Object::Function(function) => self.invoke(&data.paren, &function.declaration.name.lexeme, function.as_ref(), arguments),
            Object::NativeFunction(native) => self.invoke(&data.paren, &native.name, native.as_ref(), arguments),
            Object::Class(class_rc) => {
                let (name, arity) = {
                    let class = class_rc.borrow();
                    (class.name.clone(), class.arity())
                };

                if arguments.len() != arity {
                    return Err(RuntimeError::new(
                        data.paren.clone(),
                        format!("'{name}' expected {arity} arguments but got {}.", arguments.len()),
                    )
                    .into());
                }

                Ok(Class::instantiate(&class_rc, self, arguments)?)
            }
            _ => Err(RuntimeError::new(data.paren.clone(), "Can only call functions and classes".to_string()).into()),
        }
    }

    fn visit_get_expr(&mut self, data: &expr::GetData) -> Result<Object, Unwind> {
        let object = self.evaluate(&data.object)?;

        if let Object::Instance(instance) = &object {
            return Ok(instance.borrow().get(&data.name, &object)?);
        }

        Err(RuntimeError::new(data.name.clone(), format!("Object has not property '{}'", data.name.lexeme)).into())
    }

    fn visit_set_expr(&mut self, data: &expr::SetData) -> Result<Object, Unwind> {
        let object = self.evaluate(&data.object)?;

        if let Object::Instance(instance) = &object {
            let value = self.evaluate(&data.value)?;
            instance.borrow_mut().set(&data.name, value.clone())?;
            return Ok(value);
        }

        Err(RuntimeError::new(data.name.clone(), format!("Object has not property '{}'", data.name.lexeme)).into())
    }

    fn visit_super_expr(&mut self, data: &expr::SuperData) -> Result<Object, Unwind> {
        let distance = *self.locals.get(&data.id).expect("resolver always binds a depth for 'super'");

        let super_token = Token::new(Type::Super, "super".to_string(), None, data.keyword.location);
        let superclass = self.environment.borrow().get_at(distance, &super_token)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("the resolver only ever binds 'super' to a class")
        };

        let this_token = Token::new(Type::This, "this".to_string(), None, data.keyword.location);
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;

        let method = superclass
            .borrow()
            .find_method(&data.method.lexeme)
            .ok_or_else(|| RuntimeError::new(data.method.clone(), format!("Undefined property '{}'.", data.method.lexeme)))?;

        Ok(Object::from(method.bind(instance)))
    }

    fn visit_this_expr(&mut self, data: &expr::ThisData) -> Result<Object, Unwind> {
        Ok(self.lookup_variable(data.id, &data.keyword)?)
    }

    fn visit_grouping_expr(&mut self, data: &expr::GroupingData) -> Result<Object, Unwind> {
        self.evaluate(&data.expr)
    }

    fn visit_literal_expr(&mut self, data: &Literal) -> Result<Object, Unwind> {
        Ok(Object::from(data.clone()))
    }

    fn visit_logical_expr(&mut self, data: &expr::LogicalData) -> Result<Object, Unwind> {
        let left = self.evaluate(&data.left)?;

        if data.operator.r#type == Type::Or {
            if left.as_bool() {
                return Ok(left);
            }
        } else if !left.as_bool() {
            return Ok(left);
        }

        self.evaluate(&data.right)
    }

    fn visit_unary_expr(&mut self, data: &expr::UnaryData) -> Result<Object, Unwind> {
        let right = self.evaluate(&data.expr)?;

        Ok(match data.operator.r#type {
            Type::Bang => Object::from(!right.as_bool()),
            Type::Minus => {
                let n = right
                    .as_number()
                    .ok_or_else(|| RuntimeError::new(data.operator.clone(), "Operand must be a number".to_string()))?;
                Object::from(-n)
            }
            _ => unreachable!("parser never emits this token as a unary operator"),
        })
    }

    fn visit_comma_expr(&mut self, data: &expr::CommaData) -> Result<Object, Unwind> {
        for expr in &data.exprs {
            self.evaluate(expr)?;
        }

        self.evaluate(&data.last)
    }

    fn visit_variable_expr(&mut self, data: &expr::VariableData) -> Result<Object, Unwind> {
        Ok(self.lookup_variable(data.id, &data.name)?)
    }

    fn visit_input_expr(&mut self, _data: &expr::InputData) -> Result<Object, Unwind> {
        Ok(Object::from(self.read_word()))
    }
}

impl StmtVisitor<Result<(), Unwind>> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &stmt::ExpressionData) -> Result<(), Unwind> {
        self.evaluate(&data.expr)?;
        Ok(())
    }

    fn visit_print_stmt(&mut self, data: &stmt::PrintData) -> Result<(), Unwind> {
        let value = self.evaluate(&data.expr)?;
        let _ = writeln!(self.output, "{value}");
        Ok(())
    }

    fn visit_let_stmt(&mut self, data: &stmt::LetData) -> Result<(), Unwind> {
        let value = match &data.initializer {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(())
    }

    fn visit_block_stmt(&mut self, data: &stmt::BlockData) -> Result<(), Unwind> {
        let env = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(env)))
    }

    fn visit_if_stmt(&mut self, data: &stmt::IfData) -> Result<(), Unwind> {
        if self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(())
        }
    }

    fn visit_while_stmt(&mut self, data: &stmt::WhileData) -> Result<(), Unwind> {
        while self.evaluate(&data.condition)?.as_bool() {
            self.execute(&data.body)?;
        }
        Ok(())
    }

    fn visit_return_stmt(&mut self, data: &stmt::ReturnData) -> Result<(), Unwind> {
        let value = match &data.value {
            Some(expr) => self.evaluate(expr)?,
            None => Object::from(Literal::Nil),
        };

        Err(Unwind::Return(value))
    }

    fn visit_function_stmt(&mut self, data: &stmt::FunctionData) -> Result<(), Unwind> {
        let function = Function::new(Rc::new(data.clone()), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(function));
        Ok(())
    }

    fn visit_class_stmt(&mut self, data: &stmt::ClassData) -> Result<(), Unwind> {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Object::Class(class_rc) => Some(class_rc),
                    _ => {
                        let Expr::Variable(var) = expr else {
                            unreachable!("the resolver only allows a Variable as a superclass expression")
                        };
                        return Err(RuntimeError::new(var.name.clone(), "Superclass must be a class.".to_string()).into());
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::from(Literal::Nil));

        let previous_environment = superclass.as_ref().map(|superclass| {
            let mut super_env = Environment::new(Some(Rc::clone(&self.environment)));
            super_env.define("super", Object::from(Rc::clone(superclass)));
            std::mem::replace(&mut self.environment, Rc::new(RefCell::new(super_env)))
        });

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::new(method.clone()), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = Rc::new(RefCell::new(Class::new(data.name.lexeme.clone(), superclass, data.fields.clone(), methods)));

        if let Some(previous) = previous_environment {
            self.environment = previous;
        }

        self.environment.borrow_mut().assign(&data.name, Object::from(class))?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scanner::Scanner;
    use crate::parser::Parser;
    use crate::resolver::Resolver;

    fn run(source: &str) -> String {
        let tokens = Scanner::new(source).scan_tokens();
        let statements = Parser::new(tokens, 0).parse();

        let output = Rc::new(RefCell::new(Vec::new()));
        let mut interpreter = Interpreter::with_io(Box::new(Sink(Rc::clone(&output))), Box::new(io::empty()));

        {
            let mut resolver = Resolver::new(&mut interpreter);
            resolver.resolve(&statements);
        }

        interpreter.interpret(&statements);
        String::from_utf8(output.borrow().clone()).expect("test output should be valid utf8")
    }

    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn evaluate_arithmetic() {
        assert_eq!(run("print(1 + 2 * 3);"), "7\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(run(r#"print("a" + "b");"#), "ab\n");
    }

    #[test]
    fn division_by_zero_reports_runtime_error_and_stops() {
        assert_eq!(run("print(1 / 0); print(\"unreached\");"), "");
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let source = r#"
            func makeCounter() {
                let count = 0;
                func increment() {
                    count = count + 1;
                    print(count);
                }
                ret increment;
            }
            let counter = makeCounter();
            counter();
            counter();
        "#;
        assert_eq!(run(source), "1\n2\n");
    }

    #[test]
    fn classes_and_inheritance() {
        let source = r#"
            class Animal {
                func speak() {
                    print(this.sound);
                }
            }
            class Dog extends Animal {
                let sound;
                func init() {
                    this.sound = "Woof";
                }
            }
            let dog = Dog();
            dog.speak();
        "#;
        assert_eq!(run(source), "Woof\n");
    }

    #[test]
    fn super_calls_reach_the_parent_method() {
        let source = r#"
            class A {
                func greet() {
                    print("A");
                }
            }
            class B extends A {
                func greet() {
                    super.greet();
                    print("B");
                }
            }
            B().greet();
        "#;
        assert_eq!(run(source), "A\nB\n");
    }
}
