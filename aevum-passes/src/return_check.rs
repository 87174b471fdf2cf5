//! Checks that `return` only appears inside a function body.

use aevum_parser::ast::Stmt;
use aevum_parser::visitor::{walk_stmt, Visitor};
use aevum_source::{Location, Source, SyntaxError};

pub struct ReturnCheck<'a> {
    /// Number of function declarations enclosing the statement being visited. `0` is top level.
    function_depth: u32,
    source: &'a Source<'a>,
}

impl<'a> ReturnCheck<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            function_depth: 0,
            source,
        }
    }

    pub fn check_program(&mut self, program: &[Stmt]) {
        for stmt in program {
            self.visit_stmt(stmt);
        }
    }
}

impl<'a, 'ast> Visitor<'ast> for ReturnCheck<'a> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::FnDeclaration(_) => {
                self.function_depth += 1;
                walk_stmt(self, stmt);
                self.function_depth -= 1;
            }
            Stmt::ReturnStmt { line, .. } if self.function_depth == 0 => {
                self.source.errors.add_error(SyntaxError::new(
                    "Can't return from top-level code.",
                    *line,
                    Location::Lexeme("return".to_string()),
                ));
                walk_stmt(self, stmt);
            }
            _ => walk_stmt(self, stmt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aevum_parser::parser::parse;

    fn check(source: &str) -> String {
        let source = source.into();
        let program = parse(&source);
        assert!(source.has_no_errors(), "{}", source.errors);
        ReturnCheck::new(&source).check_program(&program);
        source.errors.to_string()
    }

    #[test]
    fn return_inside_function() {
        assert_eq!(check("fun f() { if (true) { return 1; } return; }"), "");
        assert_eq!(
            check("fun outer() { fun inner() { return 2; } return inner; }"),
            ""
        );
    }

    #[test]
    fn return_at_top_level() {
        assert_eq!(
            check("print 1;\nreturn 2;"),
            "[line 2] Error at 'return': Can't return from top-level code.\n"
        );
        assert_eq!(
            check("{\n  while (true) return;\n}"),
            "[line 2] Error at 'return': Can't return from top-level code.\n"
        );
    }

    #[test]
    fn return_after_function() {
        assert_eq!(
            check("fun f() { return 1; }\nreturn f();"),
            "[line 2] Error at 'return': Can't return from top-level code.\n"
        );
    }
}
