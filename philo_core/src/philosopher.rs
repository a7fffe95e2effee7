//! Philosopher state and the per-thread dining routine.
//!
//! Each philosopher thread runs:
//!
//! ```text
//! barrier -> seed last meal -> register -> [odd id: wait eat/2]
//!   loop { take forks -> eat -> full? stop | sleep -> think }
//! ```
//!
//! Deadlock is avoided by the fork assignment alone: odd and even
//! identities pick up their two forks in opposite orders, so the circular
//! wait where everybody holds one fork and waits for the next never forms.

use crate::sync::lock;
use crate::table::Table;
use crate::waiter::precise_sleep;

use philo_env::{PhilosopherId, Status};
use serde::Serialize;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing::trace;

/// How long the lone philosopher naps between termination checks.
const LONE_POLL_INTERVAL: Duration = Duration::from_micros(200);

/// A philosopher's private scalars, guarded by its own lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealState {
    /// Clock milliseconds of the last time both forks were held
    pub last_meal_ms: u64,
    
    /// Meals started so far
    pub meals_eaten: u64,
    
    /// Meal cap reached; the philosopher no longer competes or prints
    pub full: bool,
}

/// One seat at the table.
#[derive(Debug)]
pub struct Philosopher {
    id: PhilosopherId,
    first_fork: usize,
    second_fork: usize,
    state: Mutex<MealState>,
}

impl Philosopher {
    /// Seats the philosopher at `position` of a table of `count`.
    ///
    /// Fork `position` is on one side and fork `(position + 1) % count` on
    /// the other. Odd identities start with the latter, even identities
    /// with the former.
    pub fn seat(position: usize, count: usize) -> Self {
        let id = PhilosopherId::from_position(position);
        let own = position;
        let next = (position + 1) % count;
        let (first_fork, second_fork) = if id.is_odd() { (next, own) } else { (own, next) };
        
        Self {
            id,
            first_fork,
            second_fork,
            state: Mutex::new(MealState::default()),
        }
    }
    
    pub fn id(&self) -> PhilosopherId {
        self.id
    }
    
    /// Index of the fork picked up first.
    pub fn first_fork(&self) -> usize {
        self.first_fork
    }
    
    /// Index of the fork picked up second.
    pub fn second_fork(&self) -> usize {
        self.second_fork
    }
    
    /// Snapshot of the private state.
    pub fn meal_state(&self) -> MealState {
        *lock(&self.state)
    }
    
    pub fn is_full(&self) -> bool {
        lock(&self.state).full
    }
    
    pub fn meals_eaten(&self) -> u64 {
        lock(&self.state).meals_eaten
    }
    
    /// True if the philosopher is not full and has gone more than
    /// `time_to_die_ms` without a meal at clock time `now_ms`.
    pub fn is_starving(&self, now_ms: u64, time_to_die_ms: u64) -> bool {
        let state = lock(&self.state);
        !state.full && now_ms.saturating_sub(state.last_meal_ms) > time_to_die_ms
    }
    
    pub(crate) fn mark_full(&self) {
        lock(&self.state).full = true;
    }
    
    fn set_last_meal(&self, now_ms: u64) {
        lock(&self.state).last_meal_ms = now_ms;
    }
    
    // =========================================================================
    // ROUTINES
    // =========================================================================
    
    /// Thread body for tables of two or more.
    pub(crate) fn dine(&self, table: &Table) {
        if !self.join_table(table) {
            return;
        }
        
        let config = table.config();
        if self.id.is_odd() {
            precise_sleep(table.clock(), config.time_to_eat() / 2, table);
        }
        
        while !table.is_finished() {
            self.eat(table);
            if self.is_full() {
                trace!(philosopher = %self.id, "full, leaving the table");
                break;
            }
            table.write_status(self, Status::Sleeping);
            precise_sleep(table.clock(), config.time_to_sleep(), table);
            self.think(table);
        }
    }
    
    /// Thread body for a table of one: a single fork is never enough, so the
    /// philosopher holds it and waits for the monitor to declare it dead.
    pub(crate) fn dine_alone(&self, table: &Table) {
        if !self.join_table(table) {
            return;
        }
        
        let _fork = table.fork(self.first_fork).take();
        table.write_status(self, Status::TakeFirstFork);
        while !table.is_finished() {
            thread::sleep(LONE_POLL_INTERVAL);
        }
    }
    
    /// Waits at the barrier, seeds the deadline clock and registers.
    fn join_table(&self, table: &Table) -> bool {
        if !table.wait_for_start() {
            return false;
        }
        self.set_last_meal(table.clock().now_ms());
        table.register_running();
        true
    }
    
    fn eat(&self, table: &Table) {
        let config = table.config();
        
        let first = table.fork(self.first_fork).take();
        table.write_status(self, Status::TakeFirstFork);
        let second = table.fork(self.second_fork).take();
        table.write_status(self, Status::TakeSecondFork);
        
        let meals = {
            let mut state = lock(&self.state);
            state.last_meal_ms = table.clock().now_ms();
            state.meals_eaten += 1;
            state.meals_eaten
        };
        table.write_status(self, Status::Eating);
        precise_sleep(table.clock(), config.time_to_eat(), table);
        
        if config.meal_cap() == Some(meals) {
            self.mark_full();
        }
        drop(second);
        drop(first);
    }
    
    /// Odd tables add half a meal of thinking so turns stay balanced.
    fn think(&self, table: &Table) {
        table.write_status(self, Status::Thinking);
        if table.config().is_odd_table() {
            precise_sleep(table.clock(), table.config().time_to_eat() / 2, table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DinnerConfig;
    use crate::testing::memory_table;
    use proptest::prelude::*;
    use std::collections::HashSet;
    
    #[test]
    fn test_seat_odd_and_even_order() {
        // Philosopher 1 (odd) starts with the fork it shares with philosopher 2.
        let first = Philosopher::seat(0, 4);
        assert_eq!((first.first_fork(), first.second_fork()), (1, 0));
        
        let second = Philosopher::seat(1, 4);
        assert_eq!((second.first_fork(), second.second_fork()), (1, 2));
        
        // The last seat wraps around to fork 0.
        let last = Philosopher::seat(3, 4);
        assert_eq!((last.first_fork(), last.second_fork()), (3, 0));
    }
    
    #[test]
    fn test_lone_philosopher_has_one_fork() {
        let lone = Philosopher::seat(0, 1);
        assert_eq!(lone.first_fork(), 0);
        assert_eq!(lone.second_fork(), 0);
    }
    
    #[test]
    fn test_starving_rules() {
        let philosopher = Philosopher::seat(0, 3);
        philosopher.set_last_meal(1_000);
        
        assert!(!philosopher.is_starving(1_410, 410));
        assert!(philosopher.is_starving(1_411, 410));
        
        philosopher.mark_full();
        assert!(!philosopher.is_starving(5_000, 410));
    }
    
    #[test]
    fn test_eat_updates_meal_state_and_caps() {
        let config = DinnerConfig::from_millis(2, 800, 60, 60)
            .unwrap()
            .with_meal_cap(1);
        let (table, sink) = memory_table(config);
        table.open_barrier();
        let philosopher = &table.philosophers()[1];
        
        let before = table.clock().now_ms();
        philosopher.eat(&table);
        let state = philosopher.meal_state();
        
        assert_eq!(state.meals_eaten, 1);
        assert!(state.full);
        assert!(state.last_meal_ms >= before);
        // Both forks are back on the table.
        assert!(table.forks().iter().all(|f| f.pickups() == 1));
        
        let statuses: Vec<Status> = sink.lines().iter().map(|l| l.status).collect();
        assert_eq!(
            statuses,
            vec![Status::TakeFirstFork, Status::TakeSecondFork, Status::Eating]
        );
    }
    
    proptest! {
        #[test]
        fn prop_seating_uses_adjacent_forks(count in 2usize..300) {
            for position in 0..count {
                let philosopher = Philosopher::seat(position, count);
                let pair: HashSet<usize> = [philosopher.first_fork(), philosopher.second_fork()].into();
                let expected: HashSet<usize> = [position, (position + 1) % count].into();
                prop_assert_eq!(pair, expected);
            }
        }
        
        #[test]
        fn prop_seating_breaks_circular_wait(count in 2usize..300) {
            // If every philosopher grabbed a distinct first fork, all N could
            // hold one fork each and wait forever. Two must share a first fork.
            let firsts: HashSet<usize> = (0..count)
                .map(|position| Philosopher::seat(position, count).first_fork())
                .collect();
            prop_assert!(firsts.len() < count);
        }
    }
}
