use crate::environment::EnvRef;
use crate::host::Host;
use crate::Value;
use aevum_parser::ast::FunctionDecl;
use std::fmt;
use std::io;
use std::rc::Rc;
use thiserror::Error;

/// Failure inside a native function. The evaluator attaches the line of the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NativeError(pub String);

impl NativeError {
    pub fn new(message: impl ToString) -> Self {
        Self(message.to_string())
    }
}

impl From<io::Error> for NativeError {
    fn from(err: io::Error) -> Self {
        Self(format!("I/O error: {}", err))
    }
}

pub type NativeFnPtr = dyn Fn(&mut Host, &[Value]) -> Result<Value, NativeError>;

#[derive(Clone)]
pub struct NativeFn {
    pub ident: String,
    /// Number of arguments that the function accepts.
    pub arity: usize,
    pub func: &'static NativeFnPtr,
}

/// A user-defined function: its declaration and the environment it was declared in.
#[derive(Clone)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: EnvRef,
}

/// Anything that can be called.
#[derive(Clone)]
pub enum Callable {
    Function(Function),
    NativeFn(NativeFn),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Function(function) => function.declaration.params.len(),
            Callable::NativeFn(native) => native.arity,
        }
    }

    pub fn ident(&self) -> &str {
        match self {
            Callable::Function(function) => &function.declaration.ident.name,
            Callable::NativeFn(native) => &native.ident,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function(_) => write!(f, "<fn {}>", self.ident()),
            Callable::NativeFn(_) => write!(f, "<native fn {}>", self.ident()),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
