//! The starvation watchdog.

use crate::dinner::DinnerOutcome;
use crate::table::Table;

use crossbeam::utils::Backoff;
use philo_env::Status;
use std::thread;
use tracing::debug;

/// Monitor thread body.
///
/// Waits until every philosopher has registered, then scans the table in
/// index order until the simulation ends. The first starving philosopher
/// found ends the simulation and gets the death line, so simultaneous
/// starvations always resolve to the lowest id.
///
/// Returns `None` when something else ended the simulation (every
/// philosopher full, or a failure).
pub(crate) fn watch(table: &Table) -> Option<DinnerOutcome> {
    let backoff = Backoff::new();
    while !table.all_running() {
        if table.is_finished() {
            return None;
        }
        backoff.snooze();
    }
    debug!("Monitor watching {} philosophers", table.philosophers().len());
    
    let time_to_die_ms = table.config().time_to_die_ms();
    let window_ms = table
        .config()
        .observation_window()
        .map(|window| u64::try_from(window.as_millis()).unwrap_or(u64::MAX));
    let mut verdict = None;
    
    while !table.is_finished() {
        for philosopher in table.philosophers() {
            if table.is_finished() {
                break;
            }
            if philosopher.is_starving(table.clock().now_ms(), time_to_die_ms) {
                table.finish();
                let at_ms = table
                    .write_status(philosopher, Status::Died)
                    .map_or_else(|| table.elapsed_ms(), |line| line.elapsed_ms);
                debug!(philosopher = %philosopher.id(), at_ms, "starved");
                verdict = Some(DinnerOutcome::Death {
                    philosopher: philosopher.id(),
                    at_ms,
                });
            }
        }
        
        if verdict.is_none() && window_ms.is_some_and(|window| table.elapsed_ms() >= window) {
            debug!("Observation window elapsed without a death");
            table.finish();
            verdict = Some(DinnerOutcome::WindowElapsed);
        }
        thread::yield_now();
    }
    
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DinnerConfig;
    use crate::testing::memory_table;
    use philo_env::PhilosopherId;
    use std::time::Duration;
    
    #[test]
    fn test_monitor_reports_lowest_id_on_tie() {
        let config = DinnerConfig::from_millis(3, 60, 60, 60).unwrap();
        let (table, sink) = memory_table(config);
        table.open_barrier();
        // Nobody seeds a meal: every philosopher starves at the same instant.
        for _ in 0..3 {
            table.register_running();
        }
        std::thread::sleep(Duration::from_millis(80));
        
        let verdict = watch(&table);
        
        match verdict {
            Some(DinnerOutcome::Death { philosopher, .. }) => {
                assert_eq!(philosopher, PhilosopherId::new(1));
            }
            other => panic!("expected a death, got {:?}", other),
        }
        assert!(table.is_finished());
        
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].status, Status::Died);
    }
    
    #[test]
    fn test_monitor_skips_full_philosophers() {
        let config = DinnerConfig::from_millis(2, 60, 60, 60).unwrap();
        let (table, sink) = memory_table(config);
        table.open_barrier();
        table.register_running();
        table.register_running();
        table.philosophers()[0].mark_full();
        
        let verdict = watch(&table);
        
        assert!(matches!(
            verdict,
            Some(DinnerOutcome::Death { philosopher, .. }) if philosopher == PhilosopherId::new(2)
        ));
        assert_eq!(sink.lines().len(), 1);
    }
    
    #[test]
    fn test_monitor_observation_window() {
        let config = DinnerConfig::from_millis(1, 60_000, 60, 60)
            .unwrap()
            .with_observation_window(Duration::from_millis(30));
        let (table, sink) = memory_table(config);
        table.open_barrier();
        table.register_running();
        
        assert_eq!(watch(&table), Some(DinnerOutcome::WindowElapsed));
        assert!(sink.lines().is_empty());
    }
    
    #[test]
    fn test_monitor_stops_if_finished_before_everyone_runs() {
        let config = DinnerConfig::from_millis(4, 60, 60, 60).unwrap();
        let (table, _) = memory_table(config);
        table.register_running();
        table.finish();
        
        assert_eq!(watch(&table), None);
    }
}
