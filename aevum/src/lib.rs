//! Runs Aevum source text through the whole pipeline: scan, parse, check, evaluate.

pub mod builtin_functions;
pub mod repl;

use aevum_eval::{Evaluator, InterpretResult, RuntimeError};
use aevum_parser::parser::Parser;
use aevum_passes::return_check::ReturnCheck;
use aevum_source::{Source, SyntaxError};
use aevum_value::Host;

/// What happened to one chunk of source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    /// The chunk was not executed.
    CompileErrors(Vec<SyntaxError>),
    RuntimeError(RuntimeError),
}

/// One interpreter instance. Globals, inventory and stats persist across [`Session::run`] calls.
pub struct Session {
    evaluator: Evaluator,
}

impl Session {
    pub fn new(host: Host) -> Self {
        let builtin_vars = builtin_functions::default_builtin_vars();
        Self {
            evaluator: Evaluator::new(&builtin_vars, host),
        }
    }

    pub fn host(&self) -> &Host {
        self.evaluator.host()
    }

    /// Runs one chunk. Its lines are numbered from `1`.
    pub fn run(&mut self, source: &str) -> Outcome {
        self.run_at(source, 1)
    }

    /// Runs one chunk whose first line is numbered `start_line`.
    pub fn run_at(&mut self, source: &str, start_line: usize) -> Outcome {
        let source = Source::with_start_line(source, start_line);
        let program = Parser::new(&source).parse_program();
        if source.has_no_errors() {
            ReturnCheck::new(&source).check_program(&program);
        }

        if !source.has_no_errors() {
            tracing::debug!(count = source.errors.len(), "chunk has compile errors, skipping");
            return Outcome::CompileErrors(source.errors.errors());
        }

        match self.evaluator.interpret(&program) {
            InterpretResult::Ok => Outcome::Ok,
            InterpretResult::RuntimeError(err) => Outcome::RuntimeError(err),
        }
    }
}
