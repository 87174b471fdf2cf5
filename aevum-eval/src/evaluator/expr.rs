use super::{ControlFlow, EvalResult, Evaluator, RuntimeError};
use aevum_parser::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use aevum_value::{Callable, Environment, Value};
use std::rc::Rc;

/// Generate evaluation for a binary operator on two numbers.
macro_rules! gen_num_binary_op {
    ($lhs: expr, $rhs: expr, $line: expr, $op: tt, $result: path) => {{
        match (&$lhs, &$rhs) {
            (Value::Number(a), Value::Number(b)) => Ok($result(*a $op *b)),
            _ => Err(RuntimeError::new("Operands must be numbers.", $line)),
        }
    }};

    ($lhs: expr, $rhs: expr, $line: expr, $op: tt) => {
        gen_num_binary_op!($lhs, $rhs, $line, $op, Value::Number)
    };
}

impl Evaluator {
    pub(crate) fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { op, operand, line } => {
                let operand = self.evaluate(operand)?;
                match op {
                    UnaryOp::Negate => match operand {
                        Value::Number(val) => Ok(Value::Number(-val)),
                        _ => Err(RuntimeError::new("Operand must be a number.", *line)),
                    },
                    UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                }
            }
            Expr::Binary { lhs, op, rhs, line } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                binary(*op, lhs, rhs, *line)
            }
            Expr::Logical { lhs, op, rhs } => {
                let lhs = self.evaluate(lhs)?;
                match op {
                    LogicalOp::Or if lhs.is_truthy() => Ok(lhs),
                    LogicalOp::And if !lhs.is_truthy() => Ok(lhs),
                    _ => self.evaluate(rhs),
                }
            }
            Expr::Variable(ident) => Ok(self.environment.borrow().get(&ident.name, ident.line)?),
            Expr::Assign { ident, value } => {
                let value = self.evaluate(value)?;
                self.environment
                    .borrow_mut()
                    .assign(&ident.name, value.clone(), ident.line)?;
                Ok(value)
            }
            Expr::Call { callee, args, line } => {
                let callable = match self.evaluate(callee)? {
                    Value::Callable(callable) => callable,
                    _ => {
                        return Err(RuntimeError::new(
                            "Can only call functions and classes.",
                            *line,
                        ))
                    }
                };

                let mut arguments = Vec::with_capacity(args.len());
                for arg in args {
                    arguments.push(self.evaluate(arg)?);
                }

                if arguments.len() != callable.arity() {
                    return Err(RuntimeError::new(
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            arguments.len()
                        ),
                        *line,
                    ));
                }

                self.call(&callable, arguments, *line)
            }
        }
    }

    /// Calls `callable` with arguments whose count already matches its arity.
    fn call(&mut self, callable: &Callable, arguments: Vec<Value>, line: usize) -> EvalResult<Value> {
        tracing::trace!(callee = callable.ident(), line, "call");

        match callable {
            Callable::Function(function) => {
                let mut environment = Environment::with_enclosing(Rc::clone(&function.closure));
                for (param, value) in function.declaration.params.iter().zip(arguments) {
                    environment.define(param.name.as_str(), value);
                }

                match self.execute_block(&function.declaration.body, environment.into_ref())? {
                    ControlFlow::Return(value) => Ok(value),
                    ControlFlow::Normal => Ok(Value::Nil),
                }
            }
            Callable::NativeFn(native) => (native.func)(&mut self.host, &arguments)
                .map_err(|err| RuntimeError::new(err, line)),
        }
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value, line: usize) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::from(format!("{}{}", a, b))),
            _ => Err(RuntimeError::new(
                "Operands must be two numbers or two strings.",
                line,
            )),
        },
        BinaryOp::Sub => gen_num_binary_op!(lhs, rhs, line, -),
        BinaryOp::Mul => gen_num_binary_op!(lhs, rhs, line, *),
        BinaryOp::Div => {
            if rhs == Value::Number(0.0) && matches!(lhs, Value::Number(_)) {
                return Err(RuntimeError::new("Division by zero.", line));
            }
            gen_num_binary_op!(lhs, rhs, line, /)
        }
        BinaryOp::Greater => gen_num_binary_op!(lhs, rhs, line, >, Value::Bool),
        BinaryOp::GreaterEqual => gen_num_binary_op!(lhs, rhs, line, >=, Value::Bool),
        BinaryOp::Less => gen_num_binary_op!(lhs, rhs, line, <, Value::Bool),
        BinaryOp::LessEqual => gen_num_binary_op!(lhs, rhs, line, <=, Value::Bool),
        BinaryOp::Equal => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEqual => Ok(Value::Bool(lhs != rhs)),
    }
}
