use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::Object;
use crate::stmt::LetData;
use crate::token::Token;

/// A class declaration: an optional superclass, an ordered list of
/// instance field declarations (evaluated fresh on every instantiation),
/// and its own methods.
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<RefCell<Class>>>,
    pub fields: Vec<LetData>,
    pub methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<RefCell<Class>>>,
        fields: Vec<LetData>,
        methods: HashMap<String, Rc<Function>>,
    ) -> Self {
        Class { name, superclass, fields, methods }
    }

    /// Looks up a method on this class, falling back to the superclass
    /// chain the way a field lookup never does.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        self.superclass.as_ref().and_then(|parent| parent.borrow().find_method(name))
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}

impl Class {
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    /// Instantiates this class: evaluates each field initializer in the
    /// caller's current environment (fields never see `this`, since the
    /// instance does not exist yet), then runs `init` if present.
    pub fn instantiate(
        class_rc: &Rc<RefCell<Class>>,
        interpreter: &mut Interpreter,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        use crate::object::Callable;

        let mut fields = HashMap::new();
        for field in &class_rc.borrow().fields {
            let value = match &field.initializer {
                Some(expr) => interpreter.evaluate(expr)?,
                None => Object::from(crate::literal::Literal::Nil),
            };
            fields.insert(field.name.lexeme.clone(), value);
        }

        let instance = Object::from(Instance { class: Rc::clone(class_rc), fields });

        let init = class_rc.borrow().find_method("init");
        if let Some(init) = init {
            let bound = init.bind(instance.clone());
            bound.call(interpreter, arguments)?;
        }

        Ok(instance)
    }
}

/// A runtime instance of a [`Class`]. Fields are a flat map; methods are
/// resolved through the class on every access rather than copied in.
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn get(&self, name: &Token, instance: &Object) -> Result<Object, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = self.class.borrow().find_method(&name.lexeme) {
            return Ok(Object::from(method.bind(instance.clone())));
        }

        Err(RuntimeError::new(
            name.clone(),
            format!("{} object has not property '{}'", self.class.borrow().name, name.lexeme),
        ))
    }

    pub fn set(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.fields.contains_key(&name.lexeme) {
            self.fields.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        Err(RuntimeError::new(
            name.clone(),
            format!("{} object has not property '{}'", self.class.borrow().name, name.lexeme),
        ))
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<'{}' instance>", self.class.borrow().name)
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<'{}' instance>", self.class.borrow().name)
    }
}
