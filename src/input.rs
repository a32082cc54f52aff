//! Interactive prompting, kept behind a trait so that the estimator never touches the terminal.

use std::{
    fmt::Display,
    io::{self, BufRead, BufReader, Stdin, Stderr, Write},
    str::FromStr,
};

use crate::{core::error::InputError, prelude::*};

pub trait InputProvider {
    /// Ask the question and return the trimmed answer, empty if the user just pressed Enter.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Ask until parsed: an empty answer yields `default`, anything unparsable is an [`InputError`].
    fn ask_or<T>(&mut self, question: &str, default: T) -> Result<T>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        let answer = self.ask(&format!("{question} [{default}]"))?;
        if answer.is_empty() { Ok(default) } else { Ok(parse(question, &answer)?) }
    }

    /// Ask a question that has no default.
    fn ask_required<T>(&mut self, question: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            bail!(InputError::invalid(format!("{question}: an answer is required")));
        }
        Ok(parse(question, &answer)?)
    }
}

fn parse<T>(question: &str, answer: &str) -> Result<T, InputError>
where
    T: FromStr,
    T::Err: Display,
{
    answer.parse().map_err(|error| InputError::invalid(format!("{question}: {error}")))
}

/// Line-oriented prompts: questions go to `writer`, answers come from `reader`.
pub struct Terminal<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Terminal<R, W> {
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl Terminal<BufReader<Stdin>, Stderr> {
    /// Prompt on standard error so that standard output stays clean for the tables.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> InputProvider for Terminal<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "{question}: ")?;
        self.writer.flush()?;
        let mut answer = String::new();
        let n_bytes = self.reader.read_line(&mut answer).context("failed to read the answer")?;
        ensure!(n_bytes != 0, "input closed before `{question}` was answered");
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::quantity::percent::Percent;

    #[test]
    fn test_ask_writes_question() -> Result {
        let mut output = Vec::new();
        let answer = Terminal::new(Cursor::new("  45 \n"), &mut output).ask("Current")?;
        assert_eq!(answer, "45");
        assert_eq!(String::from_utf8(output)?, "Current: ");
        Ok(())
    }

    #[test]
    fn test_ask_or_default_on_empty() -> Result {
        let mut terminal = Terminal::new(Cursor::new("\n"), Vec::new());
        assert_eq!(terminal.ask_or("Target", Percent::DEFAULT_TARGET)?, Percent::DEFAULT_TARGET);
        Ok(())
    }

    #[test]
    fn test_ask_required_rejects_empty() {
        let mut terminal = Terminal::new(Cursor::new("\n"), Vec::new());
        let error = terminal.ask_required::<Percent>("Current").unwrap_err();
        assert!(matches!(error.downcast_ref::<InputError>(), Some(InputError::InvalidInput { .. })));
    }

    #[test]
    fn test_ask_required_rejects_garbage() {
        let mut terminal = Terminal::new(Cursor::new("abc\n"), Vec::new());
        let error = terminal.ask_required::<Percent>("Current").unwrap_err();
        assert!(matches!(error.downcast_ref::<InputError>(), Some(InputError::InvalidInput { .. })));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut terminal = Terminal::new(Cursor::new(""), Vec::new());
        assert!(terminal.ask("Current").is_err());
    }
}
