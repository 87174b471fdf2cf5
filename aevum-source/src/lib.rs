//! Source code representation and error management.

use std::{cell::RefCell, fmt};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Line number of the first line of `content`.
    pub start_line: usize,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`, starting at line `1`.
    pub fn new(content: &'a str) -> Self {
        Self::with_start_line(content, 1)
    }

    /// Create a new `Source` whose first line is numbered `start_line`.
    pub fn with_start_line(content: &'a str, start_line: usize) -> Self {
        Self {
            content,
            start_line,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// Where in the token stream a [`SyntaxError`] was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Detected by the scanner; there is no token yet.
    Scan,
    /// At the token with the given lexeme.
    Lexeme(String),
    /// At the end of input.
    End,
}

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub location: Location,
}

impl SyntaxError {
    /// Create a new syntax error reported by the scanner.
    pub fn scan(message: impl ToString, line: usize) -> Self {
        Self {
            message: message.to_string(),
            line,
            location: Location::Scan,
        }
    }

    /// Create a new syntax error located at the specified token.
    pub fn new(message: impl ToString, line: usize, location: Location) -> Self {
        Self {
            message: message.to_string(),
            line,
            location,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Location::Scan => write!(f, "[line {}] Error: {}", self.line, self.message),
            Location::Lexeme(lexeme) => write!(
                f,
                "[line {}] Error at '{}': {}",
                self.line, lexeme, self.message
            ),
            Location::End => write!(f, "[line {}] Error at end: {}", self.line, self.message),
        }
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<SyntaxError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: SyntaxError) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    /// Returns a copy of all the errors reported so far, in report order.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.errors.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let scan = SyntaxError::scan("Unterminated string.", 2);
        assert_eq!(scan.to_string(), "[line 2] Error: Unterminated string.");

        let at = SyntaxError::new("Expect ';' after value.", 3, Location::Lexeme("}".into()));
        assert_eq!(at.to_string(), "[line 3] Error at '}': Expect ';' after value.");

        let end = SyntaxError::new("Expect expression.", 1, Location::End);
        assert_eq!(end.to_string(), "[line 1] Error at end: Expect expression.");
    }

    #[test]
    fn reporter_accumulates() {
        let source: Source = "print 1;".into();
        assert!(source.has_no_errors());
        source.errors.add_error(SyntaxError::scan("a", 1));
        source.errors.add_error(SyntaxError::scan("b", 4));
        assert!(!source.has_no_errors());
        assert_eq!(source.errors.len(), 2);
        assert_eq!(
            source.errors.to_string(),
            "[line 1] Error: a\n[line 4] Error: b\n"
        );
    }
}
