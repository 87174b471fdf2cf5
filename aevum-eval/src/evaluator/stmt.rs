use super::{ControlFlow, EvalResult, Evaluator, RuntimeError};
use aevum_parser::ast::Stmt;
use aevum_value::{Callable, EnvRef, Environment, Function, Value};
use std::mem;
use std::rc::Rc;

impl Evaluator {
    pub(crate) fn execute(&mut self, stmt: &Stmt) -> EvalResult<ControlFlow> {
        match stmt {
            Stmt::ExprStmt(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Print { expr, line } => {
                let value = self.evaluate(expr)?;
                self.host
                    .write_line(&value)
                    .map_err(|err| RuntimeError::new(format!("I/O error: {}", err), *line))?;
            }
            Stmt::VarDeclaration { ident, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.environment
                    .borrow_mut()
                    .define(ident.name.as_str(), value);
            }
            Stmt::Block(body) => {
                tracing::trace!(len = body.len(), "entering block scope");
                let environment = Environment::with_enclosing(Rc::clone(&self.environment));
                return self.execute_block(body, environment.into_ref());
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let ControlFlow::Return(value) = self.execute(body)? {
                        return Ok(ControlFlow::Return(value));
                    }
                }
            }
            Stmt::FnDeclaration(declaration) => {
                let function = Function {
                    declaration: Rc::clone(declaration),
                    closure: Rc::clone(&self.environment),
                };
                self.environment.borrow_mut().define(
                    declaration.ident.name.as_str(),
                    Value::Callable(Rc::new(Callable::Function(function))),
                );
            }
            Stmt::ReturnStmt { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes `body` with `environment` as the innermost scope. The previous scope is
    /// restored whether the body completes, returns or fails.
    pub(crate) fn execute_block(
        &mut self,
        body: &[Stmt],
        environment: EnvRef,
    ) -> EvalResult<ControlFlow> {
        let previous = mem::replace(&mut self.environment, environment);
        let result = self.execute_stmts(body);
        self.environment = previous;
        result
    }

    fn execute_stmts(&mut self, body: &[Stmt]) -> EvalResult<ControlFlow> {
        for stmt in body {
            if let ControlFlow::Return(value) = self.execute(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }
}
