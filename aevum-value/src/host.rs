//! Everything outside the language a running program can touch: output, input and the [`World`].

use crate::world::World;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Where `input()` reads its lines from.
enum Input {
    Reader(Box<dyn BufRead>),
    /// The process' standard input, read through std's own buffer so that a line editor
    /// reading the same stream never loses lines to a second buffer.
    Stdin,
}

impl Input {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        match self {
            Input::Reader(reader) => reader.read_line(buf),
            Input::Stdin => io::stdin().read_line(buf),
        }
    }
}

pub struct Host {
    pub world: World,
    output: Box<dyn Write>,
    input: Input,
}

impl Host {
    pub fn new(output: Box<dyn Write>, input: Box<dyn BufRead>, seed: Option<u64>) -> Self {
        Self {
            world: World::new(seed),
            output,
            input: Input::Reader(input),
        }
    }

    /// A host on the process' standard output and standard input.
    pub fn stdio(seed: Option<u64>) -> Self {
        Self {
            world: World::new(seed),
            output: Box::new(io::stdout()),
            input: Input::Stdin,
        }
    }

    /// Writes one line of program output.
    pub fn write_line(&mut self, line: impl fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    /// Writes `prompt` and reads one line, without its line terminator. `None` at end of input.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(len);
        Ok(Some(line))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

/// An in-memory output sink that can be read back while a [`Host`] owns a clone of it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Returns the contents and empties the buffer.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn write_and_prompt() {
        let output = SharedBuffer::new();
        let input = Cursor::new(b"north\r\nsouth".to_vec());
        let mut host = Host::new(Box::new(output.clone()), Box::new(input), Some(1));

        host.write_line("hello").unwrap();
        assert_eq!(host.prompt("> ").unwrap(), Some("north".to_string()));
        assert_eq!(host.prompt("> ").unwrap(), Some("south".to_string()));
        assert_eq!(host.prompt("> ").unwrap(), None);
        assert_eq!(output.take(), "hello\n> > > ");
        assert_eq!(output.contents(), "");
    }
}
