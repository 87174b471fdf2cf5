pub mod evaluator;

pub use evaluator::{ControlFlow, Evaluator, InterpretResult, RuntimeError};
