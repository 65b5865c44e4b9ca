//! Interactive input sources
//!
//! The scaffolder asks for a project name through [`NameProvider`] so the
//! blocking stdin read can be swapped for a fixed value.
//!
//! Input is read from a plain [`BufRead`] rather than a `dialoguer::Input`
//! prompt: the name must also arrive through a pipe, where stdin is not a
//! TTY and an empty line is a valid (rejected) answer.

use std::io::{self, BufRead, Write};

/// Something that can produce a project name on demand
pub trait NameProvider {
    /// Obtain a raw, untrimmed name. An empty string means the user gave none.
    fn provide_name(&mut self) -> io::Result<String>;
}

/// A name that is already known
#[derive(Debug, Clone)]
pub struct FixedName(pub String);

impl NameProvider for FixedName {
    fn provide_name(&mut self) -> io::Result<String> {
        Ok(self.0.clone())
    }
}

/// Prompts on `output` and reads one line from `input`
#[derive(Debug)]
pub struct ReaderNameProvider<R, W> {
    input: R,
    output: W,
    prompt: String,
}

impl<R: BufRead, W: Write> ReaderNameProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt: "Enter new project name: ".to_string(),
        }
    }
}

impl ReaderNameProvider<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout and block on stdin
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> NameProvider for ReaderNameProvider<R, W> {
    fn provide_name(&mut self) -> io::Result<String> {
        write!(self.output, "{}", self.prompt)?;
        self.output.flush()?;

        // EOF yields an empty line, which the caller rejects
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_prompts_and_reads_one_line() {
        let mut out = Vec::new();
        let mut provider = ReaderNameProvider::new(Cursor::new("Tiger\nignored\n"), &mut out);

        assert_eq!(provider.provide_name().unwrap(), "Tiger\n");
        drop(provider);
        assert_eq!(String::from_utf8(out).unwrap(), "Enter new project name: ");
    }

    #[test]
    fn test_reader_at_eof_returns_empty() {
        let mut provider = ReaderNameProvider::new(Cursor::new(""), io::sink());
        assert_eq!(provider.provide_name().unwrap(), "");
    }

    #[test]
    fn test_fixed_name() {
        let mut provider = FixedName("Mandelbrot".to_string());
        assert_eq!(provider.provide_name().unwrap(), "Mandelbrot");
    }
}
