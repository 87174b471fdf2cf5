use crate::ast::{Expr, Program, Stmt};
use crate::lexer::{self, Token, TokenKind};
use aevum_source::{Location, Source, SyntaxError};

mod expr;
mod stmt;

/// Signals a grammar violation that has already been reported to [`Source::errors`].
/// Caught at the nearest declaration boundary, which then resynchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError;

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    /// Index of the current (peeked) token.
    current: usize,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    /// Scans `source` and prepares to parse the resulting tokens.
    pub fn new(source: &'a Source<'a>) -> Self {
        let tokens = lexer::scan(source);
        Self::with_tokens(tokens, source)
    }

    /// Parses an already scanned token sequence. A missing trailing [`TokenKind::Eof`] is added.
    pub fn with_tokens(mut tokens: Vec<Token>, source: &'a Source<'a>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(source.start_line, |token| token.line);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            current: 0,
            source,
        }
    }
}

impl<'a> Parser<'a> {
    /// Parses declarations until EOF. Statements that fail to parse are reported and left out.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                program.push(stmt);
            }
        }
        program
    }

    /// Discards tokens until a statement boundary.
    fn synchronize(&mut self) {
        tracing::trace!(line = self.peek().line, "synchronizing after parse error");
        self.next();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement() {
                return;
            }
            self.next();
        }
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Advances past the current token (never past EOF) and returns it.
    fn next(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Predicate that tests whether the current token is of kind `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) && kind != TokenKind::Eof {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats a token of kind `kind` or reports `message` at the current token.
    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.next())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Reports an error at the current token.
    fn unexpected(&self, message: &str) -> ParseError {
        self.error_at(self.peek(), message)
    }

    fn error_at(&self, token: &Token, message: &str) -> ParseError {
        let location = match token.kind {
            TokenKind::Eof => Location::End,
            _ => Location::Lexeme(token.lexeme.clone()),
        };
        self.source
            .errors
            .add_error(SyntaxError::new(message, token.line, location));
        ParseError
    }
}

/// Parses a whole program from `source`. Errors are accumulated in `source.errors`.
pub fn parse(source: &Source) -> Program {
    Parser::new(source).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn render(program: &[Stmt]) -> String {
        program
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn program(source: &str) -> String {
        let source = source.into();
        let program = parse(&source);
        assert!(source.has_no_errors(), "{}", source.errors);
        render(&program)
    }

    fn errors(source: &str) -> (String, Vec<String>) {
        let source = source.into();
        let program = parse(&source);
        let errors = source
            .errors
            .errors()
            .iter()
            .map(|error| error.to_string())
            .collect();
        (render(&program), errors)
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(program(""), "");
        assert_eq!(program("// only a comment"), "");
    }

    #[test]
    fn test_recovery_collects_multiple_errors() {
        let (program, errors) = errors("var = 1;\nprint 2;\nvar x = ;\nprint 3;");
        assert_eq!(
            errors,
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 3] Error at ';': Expect expression.",
            ]
        );
        assert_snapshot!(program, @r###"
        (print 2)
        (print 3)
        "###);
    }

    #[test]
    fn test_synchronize_stops_at_keyword() {
        let (program, errors) = errors("1 + ;\nfun f() { return 1; }\nprint f();");
        assert_eq!(errors, vec!["[line 1] Error at ';': Expect expression."]);
        assert_snapshot!(program, @r###"
        (fun f () (return 1))
        (print (call f))
        "###);
    }

    #[test]
    fn test_error_at_end() {
        let (_, errors) = errors("print 1");
        assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after value."]);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (program, errors) = errors("a + b = c;");
        assert_eq!(
            errors,
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
        // the statement is kept, without the assignment
        assert_eq!(program, "(expr (+ a b))");
    }

    #[test]
    fn test_unclosed_block() {
        let (_, errors) = errors("{ print 1;");
        assert_eq!(errors, vec!["[line 1] Error at end: Expect '}' after block."]);
    }
}
