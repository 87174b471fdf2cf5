//! Scanner: source text into an ordered sequence of [`Token`]s.

use crate::ast::Literal;
use aevum_source::{Source, SyntaxError};
use logos::{Filter, Lexer, Logos, Skip};
use std::fmt;

/// Per-scan state threaded through the lexer callbacks.
#[derive(Debug, Clone)]
pub struct ScanState {
    /// Current 1-based line.
    pub line: usize,
    /// Set when the last token spans several lines (string literals) to the line it started on.
    token_line: Option<usize>,
    /// Errors found inside callbacks, flushed into the [`Source`] by [`scan`].
    errors: Vec<SyntaxError>,
}

impl ScanState {
    fn starting_at(line: usize) -> Self {
        Self {
            line,
            token_line: None,
            errors: Vec::new(),
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(extras = ScanState)]
pub enum TokenKind {
    // punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("+")]
    Plus,
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,

    // one or two character operators
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEqual,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // literals
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[token("\"", string)]
    Str,
    #[regex("[0-9]+", number)]
    Number,

    // keywords
    #[token("and")]
    And,
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("fun")]
    Fun,
    #[token("if")]
    If,
    #[token("nil")]
    Nil,
    #[token("or")]
    Or,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,

    // misc
    #[regex(r"[ \t\r\f]+", logos::skip)]
    #[token("\n", newline)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments, the newline is left for `newline`
    #[token("/*", block_comment)]
    #[error]
    Error,

    /// Only generated by [`scan`] once the lexer is exhausted.
    Eof,
}

impl TokenKind {
    /// Returns `true` if the token kind starts a new declaration or statement.
    /// Used by the parser to find a place to resume after an error.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return
        )
    }
}

fn newline(lex: &mut Lexer<TokenKind>) -> Skip {
    lex.extras.line += 1;
    Skip
}

/// Consumes everything up to and including the closing `*/`. Nesting is not supported.
fn block_comment(lex: &mut Lexer<TokenKind>) -> Skip {
    let (consumed, newlines, terminated) = {
        let remainder = lex.remainder();
        match remainder.find("*/") {
            Some(end) => (end + 2, remainder[..end].matches('\n').count(), true),
            None => (remainder.len(), remainder.matches('\n').count(), false),
        }
    };
    lex.extras.line += newlines;
    lex.bump(consumed);

    if !terminated {
        let line = lex.extras.line;
        lex.extras
            .errors
            .push(SyntaxError::scan("Unterminated comment.", line));
    }
    Skip
}

/// Consumes a string literal body and the closing quote. Strings may span lines.
fn string(lex: &mut Lexer<TokenKind>) -> Filter<()> {
    let start_line = lex.extras.line;
    let (consumed, newlines, terminated) = {
        let remainder = lex.remainder();
        match remainder.find('"') {
            Some(end) => (end + 1, remainder[..end].matches('\n').count(), true),
            None => (remainder.len(), remainder.matches('\n').count(), false),
        }
    };
    lex.extras.line += newlines;
    lex.bump(consumed);

    if terminated {
        lex.extras.token_line = Some(start_line);
        Filter::Emit(())
    } else {
        lex.extras
            .errors
            .push(SyntaxError::scan("Unterminated string.", start_line));
        Filter::Skip
    }
}

/// Extends an integer part with a fractional part, but only when a digit follows the `.`.
fn number(lex: &mut Lexer<TokenKind>) {
    let fraction = {
        let rest = lex.remainder().as_bytes();
        if rest.len() >= 2 && rest[0] == b'.' && rest[1].is_ascii_digit() {
            1 + rest[1..].iter().take_while(|b| b.is_ascii_digit()).count()
        } else {
            0
        }
    };
    lex.bump(fraction);
}

/// A lexical token. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, line: usize) -> Self {
        let literal = match kind {
            TokenKind::Number => lexeme.parse().ok().map(Literal::Number),
            TokenKind::Str => Some(Literal::Str(lexeme[1..lexeme.len() - 1].to_string())),
            TokenKind::True => Some(Literal::Bool(true)),
            TokenKind::False => Some(Literal::Bool(false)),
            _ => None,
        };
        Self {
            kind,
            lexeme: lexeme.to_string(),
            literal,
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            literal: None,
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} line {}", self.kind, self.lexeme, self.line)
    }
}

/// Scans the whole of `source`. Never fails: errors are added to `source.errors`
/// and the offending text is skipped. The result always ends with an [`TokenKind::Eof`] token.
pub fn scan(source: &Source) -> Vec<Token> {
    let mut lexer = TokenKind::lexer_with_extras(source.content, ScanState::starting_at(source.start_line));
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        flush_errors(&mut lexer, source);
        let line = lexer.extras.token_line.take().unwrap_or(lexer.extras.line);

        match kind {
            TokenKind::Error => source.errors.add_error(SyntaxError::scan(
                format!("Invalid character '{}'.", lexer.slice()),
                line,
            )),
            _ => tokens.push(Token::new(kind, lexer.slice(), line)),
        }
    }
    flush_errors(&mut lexer, source);

    tokens.push(Token::eof(lexer.extras.line));
    tracing::trace!(count = tokens.len(), "scanned tokens");
    tokens
}

fn flush_errors(lexer: &mut Lexer<TokenKind>, source: &Source) {
    for error in lexer.extras.errors.drain(..) {
        source.errors.add_error(error);
    }
}
