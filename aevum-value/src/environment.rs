//! Chained lexical scopes.

use crate::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// A shared handle to an [`Environment`]. Closures and active calls keep their scope alive through it.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Undefined variable '{name}'.")]
pub struct UndefinedVariable {
    pub name: String,
    pub line: usize,
}

#[derive(Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// Creates an outermost (global) scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope nested in `enclosing`.
    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Binds `name` in this scope, shadowing or overwriting any existing binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Looks `name` up from this scope outwards.
    pub fn get(&self, name: &str, line: usize) -> Result<Value, UndefinedVariable> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get(name, line),
            None => Err(UndefinedVariable {
                name: name.to_string(),
                line,
            }),
        }
    }

    /// Overwrites the innermost existing binding of `name`. Never creates a binding.
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<(), UndefinedVariable> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value, line),
            None => Err(UndefinedVariable {
                name: name.to_string(),
                line,
            }),
        }
    }
}
