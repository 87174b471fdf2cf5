//! The interactive loop. Lines come from a [`LineEditor`], so the loop does not depend on
//! a particular line editing library.

use crate::{Outcome, Session};
use std::io;

/// Result of reading one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    Line(String),
    /// Ctrl-C: the pending chunk is discarded.
    Interrupted,
    Eof,
}

pub trait LineEditor {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult>;

    fn add_history(&mut self, _line: &str) {}
}

/// Reads chunks until `exit` or end of input and runs each one in `session`.
/// A chunk ends on a line where the braces opened so far are balanced.
/// Every chunk's outcome is passed to `report`.
pub fn run_repl(
    editor: &mut impl LineEditor,
    session: &mut Session,
    mut report: impl FnMut(&Outcome),
) -> io::Result<()> {
    let mut chunk = String::new();
    let mut depth = 0;

    loop {
        let prompt = if chunk.is_empty() { "> " } else { "  " };
        let line = match editor.read_line(prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => {
                chunk.clear();
                depth = 0;
                continue;
            }
            ReadResult::Eof => return Ok(()),
        };

        if chunk.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.eq_ignore_ascii_case("exit") {
                return Ok(());
            }
        }
        editor.add_history(&line);

        depth += brace_delta(&line);
        chunk.push_str(&line);
        chunk.push('\n');

        if depth <= 0 {
            report(&session.run(&chunk));
            chunk.clear();
            depth = 0;
        }
    }
}

/// Net change in brace depth over `line`. Braces inside strings and after `//` do not count.
fn brace_delta(line: &str) -> i32 {
    let mut delta = 0;
    let mut in_string = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => in_string = !in_string,
            '/' if !in_string && chars.peek() == Some(&'/') => break,
            '{' if !in_string => delta += 1,
            '}' if !in_string => delta -= 1,
            _ => {}
        }
    }
    delta
}
