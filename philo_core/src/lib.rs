//! Philo Core - Deadlock-Free Dining Philosophers Engine
//!
//! N philosophers sit around a circular table with one fork between each
//! pair of neighbours. Each one loops through eating (two forks), sleeping and
//! thinking, and dies if it goes longer than `time_to_die` without a meal.
//! This crate is the concurrency engine:
//! 1. **Forks**: one mutex each, picked up in an order that rules out deadlock
//! 2. **Philosophers**: one OS thread each, running the eat/sleep/think loop
//! 3. **Monitor**: a watchdog thread that flags the first missed deadline
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Dinner                             │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ Table: config, clock, flags (one lock), StatusLog    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │                 │                  │                │
//! │  ┌────▼─────┐     ┌─────▼────┐       ┌─────▼─────┐          │
//! │  │ philo-1  │◄───►│ philo-2  │  ...  │  monitor  │          │
//! │  └──────────┘fork └──────────┘       └───────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use philo_core::{Dinner, DinnerConfig};
//! use philo_env::StdoutSink;
//!
//! let config = DinnerConfig::from_millis(4, 410, 200, 200)?;
//! let report = Dinner::new(config, Box::new(StdoutSink::stdout())).run()?;
//! println!("{:?}", report.outcome);
//! ```

mod config;
mod dinner;
mod fork;
mod monitor;
mod philosopher;
mod status_log;
mod sync;
mod table;
mod waiter;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, DinnerConfig};
pub use dinner::{Dinner, DinnerError, DinnerOutcome, DinnerReport};
pub use fork::{Fork, ForkGuard};
pub use philosopher::{MealState, Philosopher};
pub use status_log::StatusLog;
pub use table::Table;
pub use waiter::precise_sleep;
