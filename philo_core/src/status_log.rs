//! Serialized status output.

use crate::sync::lock;
use philo_env::{EnvError, EventSink, StatusLine};
use std::sync::Mutex;
use tracing::{error, warn};

/// What happened to one line handed to `StatusLog::emit_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Emitted {
    /// The line reached the sink
    Written(StatusLine),
    
    /// Nothing was written: the line was filtered out, or the sink broke earlier
    Suppressed,
    
    /// This line broke the sink; the error is kept for `take_error`
    SinkFailed,
}

/// The single output lock of a table.
///
/// Every status line is built and written while the lock is held, so lines
/// never interleave and their timestamps follow output order. A failed write
/// is kept (first error wins) and silences the log for the rest of the run.
pub struct StatusLog {
    inner: Mutex<LogInner>,
}

struct LogInner {
    sink: Box<dyn EventSink>,
    lines_written: u64,
    error: Option<EnvError>,
}

impl StatusLog {
    /// Creates a log writing to `sink`.
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self {
            inner: Mutex::new(LogInner {
                sink,
                lines_written: 0,
                error: None,
            }),
        }
    }
    
    /// Builds a line with the lock held and writes it.
    ///
    /// `make_line` returning `None` suppresses the line. `Emitted::SinkFailed`
    /// is only returned by the call whose write broke the sink.
    pub(crate) fn emit_with<F>(&self, make_line: F) -> Emitted
    where
        F: FnOnce() -> Option<StatusLine>,
    {
        let mut inner = lock(&self.inner);
        if inner.error.is_some() {
            return Emitted::Suppressed;
        }
        let Some(line) = make_line() else {
            return Emitted::Suppressed;
        };
        
        match inner.sink.emit(&line) {
            Ok(()) => {
                inner.lines_written += 1;
                Emitted::Written(line)
            }
            Err(err) => {
                error!("Status output failed: {}", err);
                inner.error = Some(err);
                Emitted::SinkFailed
            }
        }
    }
    
    /// Number of lines written so far.
    pub fn lines_written(&self) -> u64 {
        lock(&self.inner).lines_written
    }
    
    /// Flushes the sink, keeping the first error if there is one.
    pub(crate) fn flush(&self) {
        let mut inner = lock(&self.inner);
        if inner.error.is_some() {
            return;
        }
        if let Err(err) = inner.sink.flush() {
            warn!("Flushing status output failed: {}", err);
            inner.error = Some(err);
        }
    }
    
    /// Takes the recorded output error, if any.
    pub(crate) fn take_error(&self) -> Option<EnvError> {
        lock(&self.inner).error.take()
    }
}
