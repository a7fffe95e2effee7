//! Recording sink for the scenario harness.

use philo_env::{EnvError, EventSink, StatusLine, StdoutSink};
use std::sync::{Arc, Mutex, PoisonError};

/// Sink that keeps every status line for later inspection.
///
/// Optionally echoes each line to stdout as well, so an exported run still
/// prints like a normal one. Clones share the same transcript.
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<StatusLine>>>,
    echo: bool,
}

impl RecordingSink {
    /// Creates a silent recorder.
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Creates a recorder that also prints every line.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }
    
    /// Returns a copy of the lines recorded so far.
    pub fn transcript(&self) -> Vec<StatusLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
    
    /// Number of lines recorded so far.
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, line: &StatusLine) -> Result<(), EnvError> {
        if self.echo {
            StdoutSink::stdout().emit(line)?;
        }
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*line);
        Ok(())
    }
    
    fn flush(&mut self) -> Result<(), EnvError> {
        if self.echo {
            StdoutSink::stdout().flush()?;
        }
        Ok(())
    }
}
