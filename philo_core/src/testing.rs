//! Test helpers shared by the engine's unit tests.

use crate::config::DinnerConfig;
use crate::table::Table;
use philo_env::{EnvError, EventSink, StatusLine};
use std::sync::{Arc, Mutex};

/// Collects lines in memory for inspection.
#[derive(Clone, Default)]
pub(crate) struct MemorySink(Arc<Mutex<Vec<StatusLine>>>);

impl MemorySink {
    pub(crate) fn lines(&self) -> Vec<StatusLine> {
        self.0.lock().unwrap().clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, line: &StatusLine) -> Result<(), EnvError> {
        self.0.lock().unwrap().push(*line);
        Ok(())
    }
}

/// Builds a table writing into a fresh `MemorySink`.
pub(crate) fn memory_table(config: DinnerConfig) -> (Table, MemorySink) {
    let sink = MemorySink::default();
    (Table::new(config, Box::new(sink.clone())), sink)
}
