//! Production implementation of EventSink writing text lines.

use crate::{EnvError, EventSink, StatusLine};
use std::io::{self, Write};

/// Sink that writes each status line as text to any writer.
pub struct WriterSink<W: Write + Send> {
    out: W,
}

/// The sink used by the `philo` binary.
pub type StdoutSink = WriterSink<io::Stdout>;

impl WriterSink<io::Stdout> {
    /// Creates a sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }
    
    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventSink for WriterSink<W> {
    fn emit(&mut self, line: &StatusLine) -> Result<(), EnvError> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }
    
    fn flush(&mut self) -> Result<(), EnvError> {
        self.out.flush()?;
        Ok(())
    }
}
