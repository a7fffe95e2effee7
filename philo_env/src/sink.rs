//! Output seam for status lines.

use crate::{EnvError, StatusLine};

/// Destination for the status lines of a simulation.
///
/// The engine calls `emit` with its output lock held, so implementations
/// never see two lines concurrently and need no locking of their own.
///
/// # Implementations
///
/// - **Production**: `StdoutSink` - one formatted line per event on stdout
/// - **Harness**: `RecordingSink` (philo_sim) - keeps lines for the oracle
pub trait EventSink: Send {
    /// Writes one status line.
    fn emit(&mut self, line: &StatusLine) -> Result<(), EnvError>;
    
    /// Flushes anything buffered. Called once when the dinner ends.
    fn flush(&mut self) -> Result<(), EnvError> {
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, line: &StatusLine) -> Result<(), EnvError> {
        (**self).emit(line)
    }
    
    fn flush(&mut self) -> Result<(), EnvError> {
        (**self).flush()
    }
}
