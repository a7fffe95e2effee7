//! Philosophers simulator: command-line front end and scenario harness.
//!
//! This crate wraps the `philo_core` engine with everything needed to drive
//! it from the outside:
//! - **Arguments**: strict validation of the positional numbers
//! - **Recording**: a sink that keeps every status line for later checks
//! - **Oracle**: the rules a transcript must obey, checked after the fact
//! - **Scenarios**: a named catalog of tables, plus a seeded random one
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ScenarioRunner                       │
//! │                                                          │
//! │   ScenarioId ──► DinnerConfig ──► Dinner::run            │
//! │                                      │                   │
//! │                                      ▼                   │
//! │                               RecordingSink              │
//! │                                      │                   │
//! │                                      ▼                   │
//! │                      Oracle::check(transcript, report)   │
//! │                                      │                   │
//! │                                      ▼                   │
//! │                               ScenarioResult             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use philo_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::MealCap);
//! assert!(result.passed);
//! ```

mod args;
mod exporter;
mod oracle;
mod recorder;
mod runner;
pub mod scenarios;

pub use args::{parse_dinner, parse_number, ArgError, MAX_ARG, MIN_PHASE_MS};
pub use exporter::SimExport;
pub use oracle::{Oracle, Violation, DEFAULT_TOLERANCE_MS};
pub use recorder::RecordingSink;
pub use runner::{record_dinner, ScenarioMetrics, ScenarioResult, ScenarioRunner};
