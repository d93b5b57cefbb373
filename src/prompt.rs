use crate::error::Result;
use console::Term;
use dialoguer::Input;
use std::io::{self, BufRead, Write};

/// Source of the user's answers.
pub trait Prompt {
    /// `Ok(None)` once there is no more input.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        (**self).ask(question)
    }
}

/// Reads answers from the terminal, or line by line from stdin when stderr is
/// not a terminal (piped input, redirected stderr).
#[derive(Debug)]
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            interactive: Term::stderr().is_term(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        if !self.interactive {
            return LinePrompt::new(io::stdin().lock(), io::stderr()).ask(question);
        }

        let answer = Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text();

        match answer {
            Ok(answer) => Ok(Some(answer)),
            Err(dialoguer::Error::IO(err)) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Writes the question to `echo` and reads one line from `reader`.
/// The line terminator is stripped; nothing else is.
pub struct LinePrompt<R, W> {
    reader: R,
    echo: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, echo: W) -> Self {
        Self { reader, echo }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.echo, "{}: ", question)?;
        self.echo.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.strip_suffix('\n').unwrap_or(&line);
        let answer = answer.strip_suffix('\r').unwrap_or(answer);
        Ok(Some(answer.to_string()))
    }
}
