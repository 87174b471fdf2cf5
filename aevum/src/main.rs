use aevum::repl::{run_repl, LineEditor, ReadResult};
use aevum::{Outcome, Session};
use aevum_value::Host;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::{env, fs, io, process};

// sysexits
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;
const EX_IOERR: i32 = 74;

fn main() {
    init_tracing();

    let seed = match env::var("AEVUM_SEED") {
        Ok(seed) => match seed.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(err) => {
                eprintln!("{}", style(format!("Invalid AEVUM_SEED {:?}: {}", seed, err)).red().for_stderr());
                process::exit(EX_USAGE);
            }
        },
        Err(_) => None,
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let code = match args.as_slice() {
        [] => run_prompt(seed),
        [path] => run_file(path, seed),
        _ => {
            println!("Usage: aevum [script]");
            EX_USAGE
        }
    };
    process::exit(code);
}

/// Installs a `fmt` subscriber, but only if `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_file(path: &str, seed: Option<u64>) -> i32 {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("{}", style(format!("Could not read {}: {}", path, err)).red().for_stderr());
            return EX_IOERR;
        }
    };

    tracing::debug!(path, "running script");
    let mut session = Session::new(Host::stdio(seed));
    report(&session.run(&content))
}

/// Line editor on top of rustyline.
struct RustylineEditor {
    editor: DefaultEditor,
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::new(io::ErrorKind::Other, err.to_string())),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            tracing::debug!(%err, "could not add history entry");
        }
    }
}

fn run_prompt(seed: Option<u64>) -> i32 {
    let editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("{}", style(format!("Could not start the line editor: {}", err)).red().for_stderr());
            return EX_IOERR;
        }
    };

    let mut editor = RustylineEditor { editor };
    let mut session = Session::new(Host::stdio(seed));
    match run_repl(&mut editor, &mut session, |outcome| {
        report(outcome);
    }) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", style(err).red().for_stderr());
            EX_IOERR
        }
    }
}

/// Prints diagnostics to stderr and maps the outcome to an exit code.
fn report(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Ok => 0,
        Outcome::CompileErrors(errors) => {
            for error in errors {
                eprintln!("{}", style(error).red().for_stderr());
            }
            EX_DATAERR
        }
        Outcome::RuntimeError(err) => {
            eprintln!("{}", style(err).red().for_stderr());
            EX_SOFTWARE
        }
    }
}
