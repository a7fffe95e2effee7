//! The simulation controller.

use crate::config::DinnerConfig;
use crate::monitor;
use crate::table::Table;

use philo_env::{EnvError, EventSink, PhilosopherId};
use serde::Serialize;
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

/// Why a dinner ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DinnerOutcome {
    /// The monitor caught a philosopher past its deadline
    Death {
        philosopher: PhilosopherId,
        at_ms: u64,
    },
    
    /// Every philosopher reached the meal cap
    AllFull,
    
    /// The observation window ran out with nobody dead
    WindowElapsed,
    
    /// Meal cap of zero: no thread was started
    Skipped,
}

/// Summary of a finished dinner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DinnerReport {
    pub outcome: DinnerOutcome,
    
    /// Meals started by each philosopher, in seat order
    pub meals: Vec<u64>,
    
    /// Pickups of each fork, in fork order
    pub fork_pickups: Vec<u64>,
    
    /// Highest simultaneous holder count over all forks (1 when exclusive)
    pub peak_fork_holders: usize,
    
    /// Status lines written to the sink
    pub lines_written: u64,
    
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
}

impl DinnerReport {
    /// Fewest meals any philosopher had.
    pub fn min_meals(&self) -> u64 {
        self.meals.iter().copied().min().unwrap_or_default()
    }
}

/// Failures that abort a dinner. None of them is retryable.
#[derive(Debug, Error)]
pub enum DinnerError {
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Owns the table and runs one dinner on it.
pub struct Dinner {
    table: Table,
}

impl Dinner {
    /// Lays the table for `config`, with status lines going to `sink`.
    pub fn new(config: DinnerConfig, sink: Box<dyn EventSink>) -> Self {
        Self {
            table: Table::new(config, sink),
        }
    }
    
    pub fn table(&self) -> &Table {
        &self.table
    }
    
    /// Runs the dinner to its end and reports how it went.
    ///
    /// Spawns one thread per philosopher and the monitor, opens the start
    /// barrier, joins the philosophers, then ends the simulation and joins
    /// the monitor. On a spawn failure or a panicked thread the simulation is
    /// ended so every started thread unwinds, and the first error is returned.
    pub fn run(self) -> Result<DinnerReport, DinnerError> {
        let started = Instant::now();
        let table = &self.table;
        let config = table.config();
        
        if config.is_no_op() {
            info!("Meal cap is zero, nothing to simulate");
            return Ok(self.report(DinnerOutcome::Skipped, started));
        }
        
        info!(
            "Seating {} philosophers (die={}ms eat={}ms sleep={}ms cap={:?})",
            config.philosophers(),
            config.time_to_die().as_millis(),
            config.time_to_eat().as_millis(),
            config.time_to_sleep().as_millis(),
            config.meal_cap(),
        );
        
        let verdict = thread::scope(|scope| -> Result<Option<DinnerOutcome>, EnvError> {
            let alone = table.philosophers().len() == 1;
            let mut diners: Vec<(String, ScopedJoinHandle<'_, ()>)> = Vec::new();
            
            for philosopher in table.philosophers() {
                let name = format!("philo-{}", philosopher.id());
                let spawned = thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(scope, move || {
                        if alone {
                            philosopher.dine_alone(table);
                        } else {
                            philosopher.dine(table);
                        }
                    });
                match spawned {
                    Ok(handle) => diners.push((name, handle)),
                    Err(source) => {
                        table.finish();
                        return Err(EnvError::spawn(name, source));
                    }
                }
            }
            
            let watchdog = thread::Builder::new()
                .name("monitor".to_string())
                .spawn_scoped(scope, || monitor::watch(table))
                .map_err(|source| {
                    table.finish();
                    EnvError::spawn("monitor", source)
                })?;
            
            let start_ms = table.open_barrier();
            debug!(start_ms, "Start barrier open");
            
            let mut failure = None;
            for (name, handle) in diners {
                if handle.join().is_err() {
                    error!("Thread {} panicked", name);
                    table.finish();
                    failure.get_or_insert(EnvError::panicked(name));
                }
            }
            table.finish();
            
            let verdict = match watchdog.join() {
                Ok(verdict) => verdict,
                Err(_) => {
                    error!("Monitor thread panicked");
                    failure.get_or_insert(EnvError::panicked("monitor"));
                    None
                }
            };
            
            match failure {
                Some(err) => Err(err),
                None => Ok(verdict),
            }
        })?;
        
        table.log().flush();
        if let Some(err) = table.log().take_error() {
            return Err(err.into());
        }
        
        let outcome = verdict.unwrap_or(DinnerOutcome::AllFull);
        info!("Dinner over: {:?}", outcome);
        Ok(self.report(outcome, started))
    }
    
    fn report(&self, outcome: DinnerOutcome, started: Instant) -> DinnerReport {
        let table = &self.table;
        DinnerReport {
            outcome,
            meals: table.philosophers().iter().map(|p| p.meals_eaten()).collect(),
            fork_pickups: table.forks().iter().map(|f| f.pickups()).collect(),
            peak_fork_holders: table
                .forks()
                .iter()
                .map(|f| f.peak_holders())
                .max()
                .unwrap_or_default(),
            lines_written: table.log().lines_written(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
