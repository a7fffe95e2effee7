//! Error types for the philosophers environment layer.

use thiserror::Error;

/// Errors raised by the primitives the engine runs on.
///
/// None of these are retryable: the simulation has no degraded mode.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Writing a status line to the output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
    
    /// The OS refused to create a thread (thread limit, out of memory)
    #[error("Failed to spawn thread {name}: {source}")]
    ThreadSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    
    /// A simulation thread panicked before it could be joined cleanly
    #[error("Thread {0} panicked")]
    ThreadPanicked(String),
}

impl EnvError {
    /// Creates a spawn error for the named thread.
    pub fn spawn(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::ThreadSpawn {
            name: name.into(),
            source,
        }
    }
    
    /// Creates a panic error for the named thread.
    pub fn panicked(name: impl Into<String>) -> Self {
        Self::ThreadPanicked(name.into())
    }
}
