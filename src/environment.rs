use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A lexical scope: a flat map of bindings plus a link to the scope it
/// was opened inside. Globals sit at the root of the chain with no
/// enclosing environment.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    variables: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, variables: HashMap::new() }
    }

    /// Binds `name` in this scope, shadowing any binding from an
    /// enclosing scope. Re-declaring a name in the same scope is legal
    /// here; the resolver is what rejects it statically.
    pub fn define(&mut self, name: &str, value: Object) {
        self.variables.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self.enclosing.clone()
            .unwrap_or_else(|| panic!("resolver reported depth {distance} but no enclosing environment exists"));

        for _ in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("resolver reported depth {distance} but the chain is shorter"));
            environment = parent;
        }

        environment
    }

    /// Assigns to the nearest scope (outward from here) that already
    /// defines `name`. Used for globals, whose exact depth the resolver
    /// never records.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            self.variables.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'", name.lexeme)))
    }

    /// Assigns at a depth the resolver already proved is correct.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().variables.insert(name.lexeme.clone(), value);
        } else {
            self.variables.insert(name.lexeme.clone(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(variable) = self.variables.get(&name.lexeme) {
            return Ok(variable.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'", name.lexeme)))
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let read = |vars: &HashMap<String, Object>| {
            vars.get(&name.lexeme).cloned().ok_or_else(|| {
                RuntimeError::new(name.clone(), format!("Undefined variable '{}'", name.lexeme))
            })
        };

        if distance > 0 {
            read(&self.ancestor(distance).borrow().variables)
        } else {
            read(&self.variables)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
