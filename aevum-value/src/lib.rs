pub mod environment;
pub mod host;
pub mod object;
pub mod world;

use aevum_parser::ast::Literal;
use std::fmt;
use std::rc::Rc;

pub use environment::{EnvRef, Environment, UndefinedVariable};
pub use host::{Host, SharedBuffer};
pub use object::{Callable, Function, NativeError, NativeFn, NativeFnPtr};
pub use world::World;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    Str(Rc<str>),
    Bool(bool),
    Nil,
    Callable(Rc<Callable>),
}

impl Value {
    /// `nil` and `false` are falsy. Everything else, including `0` and `""`, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn cast_to_number(&self) -> Option<f64> {
        match self {
            Self::Number(val) => Some(*val),
            _ => None,
        }
    }

    pub fn cast_to_callable(&self) -> Option<&Rc<Callable>> {
        match self {
            Self::Callable(callable) => Some(callable),
            _ => None,
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(val) => Value::Number(*val),
            Literal::Str(val) => Value::Str(val.as_str().into()),
            Literal::Bool(val) => Value::Bool(*val),
            Literal::Nil => Value::Nil,
        }
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Number(val)
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.into())
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Str(val.into())
    }
}

/// Value equality. `nil` only equals `nil`; callables are equal only to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Nil, Value::Nil) => true,
            (Value::Callable(l), Value::Callable(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(val) => write!(f, "{}", val),
            Value::Str(val) => write!(f, "{}", val),
            Value::Bool(val) => write!(f, "{}", val),
            Value::Nil => write!(f, "nil"),
            Value::Callable(val) => write!(f, "{}", val),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(val) => write!(f, "{:?}", val),
            _ => fmt::Display::fmt(self, f),
        }
    }
}

/// Native functions to define in the global scope before a program runs.
#[derive(Default)]
pub struct BuiltinVars {
    pub values: Vec<(String, Value)>,
}

impl BuiltinVars {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn add_native_fn(&mut self, ident: &str, func: &'static NativeFnPtr, arity: usize) {
        let native = NativeFn {
            ident: ident.to_string(),
            arity,
            func,
        };
        self.values.push((
            ident.to_string(),
            Value::Callable(Rc::new(Callable::NativeFn(native))),
        ));
    }
}
