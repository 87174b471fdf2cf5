use aevum_parser::ast::Stmt;
use aevum_value::{BuiltinVars, EnvRef, Environment, Host, UndefinedVariable, Value};
use std::rc::Rc;
use thiserror::Error;

mod expr;
mod stmt;

/// A fault raised while running a program. Execution of the chunk stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Runtime error: {message}")]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(message: impl ToString, line: usize) -> Self {
        Self {
            message: message.to_string(),
            line,
        }
    }
}

impl From<UndefinedVariable> for RuntimeError {
    fn from(err: UndefinedVariable) -> Self {
        Self::new(err.to_string(), err.line)
    }
}

pub type EvalResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretResult {
    Ok,
    RuntimeError(RuntimeError),
}

/// How a statement finished. `Return` unwinds to the nearest enclosing call.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    Return(Value),
}

/// Tree-walking evaluator. Globals survive across calls to [`Evaluator::interpret`].
pub struct Evaluator {
    globals: EnvRef,
    /// Innermost scope of the code being executed.
    environment: EnvRef,
    host: Host,
}

impl Evaluator {
    pub fn new(builtin_vars: &BuiltinVars, host: Host) -> Self {
        let globals = Environment::new().into_ref();
        for (ident, value) in &builtin_vars.values {
            globals.borrow_mut().define(ident.as_str(), value.clone());
        }

        Self {
            environment: Rc::clone(&globals),
            globals,
            host,
        }
    }

    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Runs `program` statement by statement, stopping at the first runtime error.
    pub fn interpret(&mut self, program: &[Stmt]) -> InterpretResult {
        let mut result = InterpretResult::Ok;
        for stmt in program {
            match self.execute(stmt) {
                Ok(ControlFlow::Normal) => {}
                // rejected before execution by the return check
                Ok(ControlFlow::Return(_)) => break,
                Err(err) => {
                    tracing::debug!(line = err.line, message = %err.message, "runtime error");
                    result = InterpretResult::RuntimeError(err);
                    break;
                }
            }
        }

        // a fault inside a block must not leave us in its scope
        self.environment = Rc::clone(&self.globals);

        if let Err(err) = self.host.flush() {
            tracing::warn!(%err, "could not flush program output");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aevum_parser::parser::parse;
    use aevum_source::Source;
    use aevum_value::{NativeError, SharedBuffer};
    use std::io::Cursor;

    fn twice(_host: &mut Host, args: &[Value]) -> Result<Value, NativeError> {
        match args[0].cast_to_number() {
            Some(val) => Ok(Value::Number(val * 2.0)),
            None => Err(NativeError::new("twice expects a number.")),
        }
    }

    fn evaluator() -> (Evaluator, SharedBuffer) {
        let output = SharedBuffer::new();
        let host = Host::new(
            Box::new(output.clone()),
            Box::new(Cursor::new(Vec::new())),
            Some(0),
        );
        let mut builtin_vars = BuiltinVars::new();
        builtin_vars.add_native_fn("twice", &twice, 1);
        (Evaluator::new(&builtin_vars, host), output)
    }

    fn run_in(evaluator: &mut Evaluator, source: &str) -> InterpretResult {
        let source = Source::new(source);
        let program = parse(&source);
        assert!(source.has_no_errors(), "{}", source.errors);
        evaluator.interpret(&program)
    }

    /// Runs `source` and returns its output. Panics on a runtime error.
    fn run(source: &str) -> String {
        let (mut evaluator, output) = evaluator();
        assert_eq!(run_in(&mut evaluator, source), InterpretResult::Ok);
        output.take()
    }

    fn runtime_error(source: &str) -> (String, RuntimeError) {
        let (mut evaluator, output) = evaluator();
        match run_in(&mut evaluator, source) {
            InterpretResult::RuntimeError(err) => (output.take(), err),
            InterpretResult::Ok => panic!("expected a runtime error"),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
        assert_eq!(run("print (1 + 2) * 3;"), "9\n");
        assert_eq!(run("print 10 / 4;"), "2.5\n");
        assert_eq!(run("print -(3 - 5);"), "2\n");
        assert_eq!(run("print 8 - 2 - 1;"), "5\n");
    }

    #[test]
    fn test_comparison_and_equality() {
        assert_eq!(run("print 1 < 2; print 2 <= 1; print 3 >= 3;"), "true\nfalse\ntrue\n");
        assert_eq!(run("print nil == nil; print nil == false;"), "true\nfalse\n");
        assert_eq!(run("print \"a\" == \"a\"; print 1 != \"1\";"), "true\ntrue\n");
        assert_eq!(run("print !nil; print !0; print !\"\";"), "true\nfalse\nfalse\n");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(run("print \"foo\" + \"bar\";"), "foobar\n");

        let (_, err) = runtime_error("print 1 + \"b\";");
        assert_eq!(err.message, "Operands must be two numbers or two strings.");
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_operand_errors() {
        let (_, err) = runtime_error("-\"x\";");
        assert_eq!(err.message, "Operand must be a number.");
        let (_, err) = runtime_error("\n1 < \"2\";");
        assert_eq!(err, RuntimeError::new("Operands must be numbers.", 2));
        let (_, err) = runtime_error("1 / 0;");
        assert_eq!(err.message, "Division by zero.");
    }

    #[test]
    fn test_logical_short_circuit() {
        assert_eq!(run("print nil or \"yes\"; print 0 and 1;"), "yes\n1\n");
        assert_eq!(run("print false and undefined_name;"), "false\n");
        assert_eq!(run("print true or undefined_name;"), "true\n");
    }

    #[test]
    fn test_variables_and_scopes() {
        assert_eq!(run("var a; print a; a = 2; print a;"), "nil\n2\n");
        assert_eq!(
            run("var a = 1; { var a = 2; print a; } print a;"),
            "2\n1\n"
        );
        assert_eq!(run("var a = 1; { a = 3; } print a;"), "3\n");
        assert_eq!(run("var a = 1; var b = a = 5; print b;"), "5\n");
    }

    #[test]
    fn test_undefined_variable() {
        let (_, err) = runtime_error("print x;");
        assert_eq!(err.message, "Undefined variable 'x'.");
        let (_, err) = runtime_error("\n\ny = 1;");
        assert_eq!(err, RuntimeError::new("Undefined variable 'y'.", 3));
    }

    #[test]
    fn test_control_flow() {
        assert_eq!(run("if (1 > 2) print 1; else print 2;"), "2\n");
        assert_eq!(run("var i = 0; while (i < 3) { print i; i = i + 1; }"), "0\n1\n2\n");
        assert_eq!(run("for (var i = 0; i < 2; i = i + 1) print i;"), "0\n1\n");
    }

    #[test]
    fn test_for_loop_variable_is_scoped() {
        let (output, err) = runtime_error("for (var i = 0; i < 1; i = i + 1) {} print i;");
        assert_eq!(output, "");
        assert_eq!(err.message, "Undefined variable 'i'.");
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            run("fun add(a, b) { return a + b; } print add(1, 2);"),
            "3\n"
        );
        assert_eq!(run("fun f() {} print f();"), "nil\n");
        assert_eq!(run("fun f() { return; } print f();"), "nil\n");
        assert_eq!(run("fun f() {} print f;"), "<fn f>\n");
        assert_eq!(run("print twice;"), "<native fn twice>\n");
        assert_eq!(
            run("fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(10);"),
            "55\n"
        );
    }

    #[test]
    fn test_return_unwinds_loops() {
        assert_eq!(
            run("fun f() { while (true) { for (;;) { return 1; } } } print f();"),
            "1\n"
        );
    }

    #[test]
    fn test_closures() {
        assert_eq!(
            run(r#"
            fun makeCounter() {
                var count = 0;
                fun inc() { count = count + 1; return count; }
                return inc;
            }
            var c = makeCounter();
            c();
            print c();
            var d = makeCounter();
            print d();"#),
            "2\n1\n"
        );
    }

    #[test]
    fn test_call_errors() {
        let (_, err) = runtime_error("fun f(a, b) {} f(1);");
        assert_eq!(err.message, "Expected 2 arguments but got 1.");
        let (_, err) = runtime_error("\"text\"();");
        assert_eq!(err.message, "Can only call functions and classes.");
        let (_, err) = runtime_error("twice(1, 2);");
        assert_eq!(err.message, "Expected 1 arguments but got 2.");
    }

    #[test]
    fn test_native_call() {
        assert_eq!(run("print twice(21);"), "42\n");
        let (_, err) = runtime_error("\n\ntwice(nil);");
        assert_eq!(err, RuntimeError::new("twice expects a number.", 3));
    }

    #[test]
    fn test_runtime_error_stops_chunk() {
        let (output, err) = runtime_error("print 1; nil();\nprint 2;");
        assert_eq!(output, "1\n");
        assert_eq!(err.line, 1);
        assert_eq!(err.to_string(), "[line 1] Runtime error: Can only call functions and classes.");
    }

    #[test]
    fn test_globals_persist_across_chunks() {
        let (mut evaluator, output) = evaluator();
        assert_eq!(run_in(&mut evaluator, "var x = 1; fun get() { return x; }"), InterpretResult::Ok);
        assert!(matches!(
            run_in(&mut evaluator, "{ var y = 2; y(); }"),
            InterpretResult::RuntimeError(_)
        ));
        // back in the global scope after a fault inside a block
        assert_eq!(run_in(&mut evaluator, "var y = 3; x = 5; print get() + y;"), InterpretResult::Ok);
        assert_eq!(output.take(), "8\n");
        assert!(evaluator.globals().borrow().get("y", 1).is_ok());
    }
}
