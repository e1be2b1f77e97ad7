//! Line-based terminal I/O.

use std::fmt::Display;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};

/// Reads answers line by line and writes messages.
#[derive(Debug)]
pub struct Console<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
}

impl Console<Stdin, io::Stdout> {
    /// A console over standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), io::stdout())
    }
}

impl<R: AsyncRead + Unpin, W: Write> Console<R, W> {
    /// Creates a console over the given reader and writer.
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: BufReader::new(input).lines(),
            out,
        }
    }

    /// Writes one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()
    }

    /// Reads the next line, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    /// Asks a question and reads the answer, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be read or written.
    pub async fn prompt(&mut self, question: impl Display) -> io::Result<Option<String>> {
        write!(self.out, "{question} ")?;
        self.out.flush()?;
        self.read_line().await
    }

    /// Asks a yes/no question. Anything but `y` or `yes` means no.
    ///
    /// # Errors
    ///
    /// Returns an error if the console cannot be read or written.
    pub async fn confirm(&mut self, question: impl Display) -> io::Result<bool> {
        let answer = self.prompt(format_args!("{question} [y/N]")).await?;
        Ok(answer.is_some_and(|a| {
            let a = a.trim();
            a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
        }))
    }

    /// The writer, for inspection.
    pub const fn output(&self) -> &W {
        &self.out
    }
}
