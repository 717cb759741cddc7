/*!
Console input/output plumbing.

`LineSource` abstracts where menu answers come from: a scripted reader in
tests, or a line editor on the terminal in the real binary. `Term` pairs a
source with an output sink and is what menus and actions talk to.
*/

use anyhow::{Context, Result, bail};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::log_trace;

/// One read from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// End of input (stdin closed, script exhausted).
    Closed,
    /// Ctrl-C.
    Interrupted,
}

pub trait LineSource {
    fn next_line(&mut self) -> Result<Input>;

    /// Show `prompt` on `out`, then read. Sources that draw their own prompt
    /// override this.
    fn read_after(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Input> {
        write!(out, "{prompt}")?;
        out.flush()?;
        self.next_line()
    }
}

/// Line source over any buffered reader.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Input> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(Input::Closed),
            Ok(_) => Ok(Input::Line(strip_newline(line))),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Input::Interrupted),
            Err(e) => Err(e).context("failed to read console input"),
        }
    }
}

/// Terminal input through a line editor.
///
/// Ctrl-C while reading arrives as `ReadlineError::Interrupted`. Ctrl-C while
/// an action runs is latched by a `ctrlc` handler and reported on the next
/// read instead of killing the process.
pub struct StdinSource {
    editor: DefaultEditor,
    interrupted: Arc<AtomicBool>,
}

impl StdinSource {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to create line editor")?;

        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl+C handler")?;

        Ok(Self {
            editor,
            interrupted,
        })
    }

    fn readline(&mut self, prompt: &str) -> Result<Input> {
        if self.interrupted.swap(false, Ordering::SeqCst) {
            return Ok(Input::Interrupted);
        }
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Closed),
            Err(e) => Err(e).context("failed to read console input"),
        }
    }
}

impl LineSource for StdinSource {
    fn next_line(&mut self) -> Result<Input> {
        self.readline("")
    }

    fn read_after(&mut self, prompt: &str, out: &mut dyn Write) -> Result<Input> {
        // The editor draws the last prompt line itself.
        let (head, tail) = split_prompt(prompt);
        write!(out, "{head}")?;
        out.flush()?;
        self.readline(tail)
    }
}

/// Split at the last newline: everything up to and including it, and the
/// text the cursor sits after.
fn split_prompt(prompt: &str) -> (&str, &str) {
    match prompt.rfind('\n') {
        Some(i) => prompt.split_at(i + 1),
        None => ("", prompt),
    }
}

fn strip_newline(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

/// Operator terminal: a line source plus an output sink.
///
/// An interrupt is sticky: once seen, every further read reports it, so an
/// action prompting for input and the menu loop above it both unwind.
pub struct Term<'a> {
    input: &'a mut dyn LineSource,
    output: &'a mut dyn Write,
    interrupted: bool,
}

impl<'a> Term<'a> {
    pub fn new(input: &'a mut dyn LineSource, output: &'a mut dyn Write) -> Self {
        Self {
            input,
            output,
            interrupted: false,
        }
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Print `label` (no newline) and read one answer.
    pub fn ask(&mut self, label: &str) -> Result<Input> {
        if self.interrupted {
            return Ok(Input::Interrupted);
        }
        let input = self.input.read_after(label, self.output)?;
        log_trace!("console input: {input:?}");
        if input == Input::Interrupted {
            self.interrupted = true;
        }
        Ok(input)
    }

    /// Like `ask`, but closed input or an interrupt is an error. Used by
    /// actions collecting their arguments.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        match self.ask(label)? {
            Input::Line(value) => Ok(value.trim().to_string()),
            Input::Closed => bail!("input closed while waiting for a value"),
            Input::Interrupted => bail!("interrupted"),
        }
    }

    /// `prompt` with a fallback for an empty answer.
    pub fn prompt_or(&mut self, label: &str, default: &str) -> Result<String> {
        let value = self.prompt(label)?;
        Ok(if value.is_empty() {
            default.to_string()
        } else {
            value
        })
    }
}

impl Write for Term<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
