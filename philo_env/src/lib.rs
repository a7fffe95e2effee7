//! Philosophers Environment Layer
//!
//! This crate holds everything the dining engine needs from the outside
//! world, so the engine itself only deals with locks and threads:
//! - Time (`Clock::now()` in seconds, milliseconds or microseconds)
//! - Output (`EventSink`, one status line at a time)
//! - Cancellation (`StopSignal`, polled by every wait)
//!
//! # Example
//!
//! ```ignore
//! use philo_env::{Clock, TimeUnit, StdoutSink, EventSink, StatusLine, Status, PhilosopherId};
//!
//! let clock = Clock::new();
//! let mut sink = StdoutSink::stdout();
//! let line = StatusLine::new(clock.now(TimeUnit::Millisecond), PhilosopherId::new(1), Status::Thinking);
//! sink.emit(&line)?;
//! ```

mod clock;
mod context;
mod sink;
mod types;
mod error;
mod stdout_impl;

pub use clock::{Clock, TimeUnit};
pub use context::StopSignal;
pub use sink::EventSink;
pub use types::{PhilosopherId, Status, StatusLine};
pub use error::EnvError;
pub use stdout_impl::{StdoutSink, WriterSink};
