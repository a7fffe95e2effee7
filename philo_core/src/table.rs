//! The shared table: configuration, flags, forks, philosophers and output.

use crate::config::DinnerConfig;
use crate::fork::Fork;
use crate::philosopher::Philosopher;
use crate::status_log::{Emitted, StatusLog};
use crate::sync::lock;

use crossbeam::utils::Backoff;
use philo_env::{Clock, EventSink, StatusLine, Status, StopSignal};
use std::sync::{Mutex, OnceLock};

/// Flags shared by every thread, all behind the table lock.
#[derive(Debug, Default)]
struct TableState {
    /// Set once by whoever ends the simulation (monitor, controller, failure)
    finished: bool,
    
    /// Start barrier: opened by the controller after every thread exists
    all_ready: bool,
    
    /// Philosophers past the barrier with their deadline clock seeded
    running: usize,
}

/// Everything the philosopher threads and the monitor share.
///
/// Built once before any thread starts and borrowed by every thread of the
/// dinner; scoped threads guarantee it outlives them all.
pub struct Table {
    config: DinnerConfig,
    clock: Clock,
    start_ms: OnceLock<u64>,
    state: Mutex<TableState>,
    forks: Vec<Fork>,
    philosophers: Vec<Philosopher>,
    log: StatusLog,
}

impl Table {
    /// Lays the table: N forks in a circle and N seated philosophers.
    pub fn new(config: DinnerConfig, sink: Box<dyn EventSink>) -> Self {
        let count = config.philosophers();
        let forks = (0..count).map(Fork::new).collect();
        let philosophers = (0..count)
            .map(|position| Philosopher::seat(position, count))
            .collect();
        
        Self {
            config,
            clock: Clock::new(),
            start_ms: OnceLock::new(),
            state: Mutex::new(TableState::default()),
            forks,
            philosophers,
            log: StatusLog::new(sink),
        }
    }
    
    pub fn config(&self) -> &DinnerConfig {
        &self.config
    }
    
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
    
    pub fn forks(&self) -> &[Fork] {
        &self.forks
    }
    
    pub fn fork(&self, index: usize) -> &Fork {
        &self.forks[index]
    }
    
    pub fn philosophers(&self) -> &[Philosopher] {
        &self.philosophers
    }
    
    pub fn log(&self) -> &StatusLog {
        &self.log
    }
    
    // =========================================================================
    // TERMINATION
    // =========================================================================
    
    /// Returns true once the simulation has ended.
    pub fn is_finished(&self) -> bool {
        lock(&self.state).finished
    }
    
    /// Ends the simulation. Every wait notices on its next poll.
    pub fn finish(&self) {
        lock(&self.state).finished = true;
    }
    
    // =========================================================================
    // START BARRIER
    // =========================================================================
    
    /// Records the start timestamp and releases every waiting philosopher.
    ///
    /// Returns the start timestamp in clock milliseconds.
    pub(crate) fn open_barrier(&self) -> u64 {
        let start = *self.start_ms.get_or_init(|| self.clock.now_ms());
        lock(&self.state).all_ready = true;
        start
    }
    
    /// Spins until the barrier opens.
    ///
    /// Returns false if the simulation ended before it opened, which only
    /// happens when the launch failed part way.
    pub(crate) fn wait_for_start(&self) -> bool {
        let backoff = Backoff::new();
        loop {
            {
                let state = lock(&self.state);
                if state.all_ready {
                    return true;
                }
                if state.finished {
                    return false;
                }
            }
            backoff.snooze();
        }
    }
    
    /// Counts one more philosopher as running.
    pub(crate) fn register_running(&self) {
        lock(&self.state).running += 1;
    }
    
    /// True once every philosopher has registered.
    pub(crate) fn all_running(&self) -> bool {
        lock(&self.state).running == self.philosophers.len()
    }
    
    /// Number of philosophers registered as running.
    pub fn running(&self) -> usize {
        lock(&self.state).running
    }
    
    // =========================================================================
    // OUTPUT
    // =========================================================================
    
    /// Start timestamp in clock milliseconds (0 before the barrier opens).
    pub fn start_ms(&self) -> u64 {
        self.start_ms.get().copied().unwrap_or_default()
    }
    
    /// Milliseconds since the simulation start.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.start_ms())
    }
    
    /// Writes a status line for `philosopher`, unless it is suppressed.
    ///
    /// Nothing but `Status::Died` is written for a full philosopher, and once
    /// the simulation has ended only `Status::Died` gets through. The timestamp is taken with
    /// the output lock held. A broken output ends the simulation.
    pub fn write_status(&self, philosopher: &Philosopher, status: Status) -> Option<StatusLine> {
        if status != Status::Died && philosopher.is_full() {
            return None;
        }
        
        let written = self.log.emit_with(|| {
            let elapsed_ms = self.elapsed_ms();
            if status != Status::Died && self.is_finished() {
                return None;
            }
            Some(StatusLine::new(elapsed_ms, philosopher.id(), status))
        });
        
        match written {
            Emitted::Written(line) => Some(line),
            Emitted::Suppressed => None,
            Emitted::SinkFailed => {
                self.finish();
                None
            }
        }
    }
}

impl StopSignal for Table {
    fn should_stop(&self) -> bool {
        self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_table, MemorySink};
    use philo_env::PhilosopherId;
    
    fn table(count: usize) -> (Table, MemorySink) {
        memory_table(DinnerConfig::from_millis(count, 800, 200, 200).unwrap())
    }
    
    #[test]
    fn test_table_layout() {
        let (table, _) = table(5);
        
        assert_eq!(table.forks().len(), 5);
        assert_eq!(table.philosophers().len(), 5);
        assert_eq!(table.philosophers()[4].id(), PhilosopherId::new(5));
        assert_eq!(table.fork(2).id(), 2);
    }
    
    #[test]
    fn test_barrier_and_running_count() {
        let (table, _) = table(2);
        
        assert!(!table.all_running());
        table.open_barrier();
        assert!(table.wait_for_start());
        
        table.register_running();
        table.register_running();
        assert_eq!(table.running(), 2);
        assert!(table.all_running());
    }
    
    #[test]
    fn test_barrier_wait_gives_up_when_finished() {
        let (table, _) = table(3);
        table.finish();
        
        assert!(!table.wait_for_start());
        assert!(table.should_stop());
    }
    
    #[test]
    fn test_death_line_written_for_full_philosopher() {
        let (table, sink) = table(2);
        table.open_barrier();
        let philosopher = &table.philosophers()[0];
        
        // The philosopher filled up between the monitor's check and its report.
        philosopher.mark_full();
        table.finish();
        
        let death = table.write_status(philosopher, Status::Died);
        assert_eq!(death.map(|l| l.status), Some(Status::Died));
        assert_eq!(sink.lines().len(), 1);
    }
    
    #[test]
    fn test_write_status_suppression() {
        let (table, sink) = table(2);
        table.open_barrier();
        let first = &table.philosophers()[0];
        let second = &table.philosophers()[1];
        
        assert!(table.write_status(first, Status::Thinking).is_some());
        
        second.mark_full();
        assert!(table.write_status(second, Status::Thinking).is_none());
        
        table.finish();
        assert!(table.write_status(first, Status::Eating).is_none());
        let death = table.write_status(first, Status::Died).unwrap();
        assert_eq!(death.philosopher, PhilosopherId::new(1));
        
        let lines = sink.lines();
        let statuses: Vec<Status> = lines.iter().map(|l| l.status).collect();
        assert_eq!(statuses, vec![Status::Thinking, Status::Died]);
        assert_eq!(table.log().lines_written(), 2);
    }
}
