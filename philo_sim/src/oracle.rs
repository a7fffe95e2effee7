//! Transcript oracle.
//!
//! The Oracle holds the rules every dinner must obey and checks a recorded
//! transcript (plus the engine's report) against them:
//! - Per-philosopher grammar: fork, fork, eating, sleeping, thinking, repeat
//! - Timestamps never go backwards for a philosopher
//! - At most one death, and nothing printed after it
//! - A death comes no earlier than `time_to_die` after the last meal
//! - The meal cap is respected, and reached by everyone when all are full
//! - No fork ever had two holders

use philo_core::{DinnerConfig, DinnerOutcome, DinnerReport};
use philo_env::{PhilosopherId, Status, StatusLine};
use serde::Serialize;
use thiserror::Error;

/// Default slack for the death-timing check, in milliseconds.
///
/// The eating line is stamped when the output lock is acquired, slightly
/// after the meal itself, so the gap to the death line can look shorter
/// than the real one.
pub const DEFAULT_TOLERANCE_MS: u64 = 10;

/// A broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    #[error("philosopher {philosopher}: time went backwards ({previous_ms}ms -> {elapsed_ms}ms)")]
    TimeWentBackwards {
        philosopher: PhilosopherId,
        previous_ms: u64,
        elapsed_ms: u64,
    },
    
    #[error("philosopher {philosopher}: {status:?} cannot follow {after:?}")]
    OutOfOrder {
        philosopher: PhilosopherId,
        status: Status,
        after: Option<Status>,
    },
    
    #[error("line {index} printed after the death line")]
    OutputAfterDeath { index: usize },
    
    #[error("{0} death lines")]
    MultipleDeaths(usize),
    
    #[error("philosopher {philosopher} died {since_meal_ms}ms after its last meal, deadline is {deadline_ms}ms")]
    DiedTooEarly {
        philosopher: PhilosopherId,
        since_meal_ms: u64,
        deadline_ms: u64,
    },
    
    #[error("philosopher {philosopher} ate {meals} times, cap is {cap}")]
    TooManyMeals {
        philosopher: PhilosopherId,
        meals: u64,
        cap: u64,
    },
    
    #[error("philosopher {philosopher} ate {meals} times but everyone should be full at {cap}")]
    NotFull {
        philosopher: PhilosopherId,
        meals: u64,
        cap: u64,
    },
    
    #[error("a fork had {0} simultaneous holders")]
    ForkShared(usize),
    
    #[error("outcome {0:?} does not match the transcript")]
    OutcomeMismatch(DinnerOutcome),
}

/// Checks transcripts of dinners run with one configuration.
#[derive(Debug, Clone)]
pub struct Oracle {
    philosophers: usize,
    time_to_die_ms: u64,
    meal_cap: Option<u64>,
    tolerance_ms: u64,
}

impl Oracle {
    /// Creates an oracle for dinners run with `config`.
    pub fn new(config: &DinnerConfig) -> Self {
        Self {
            philosophers: config.philosophers(),
            time_to_die_ms: config.time_to_die_ms(),
            meal_cap: config.meal_cap(),
            tolerance_ms: DEFAULT_TOLERANCE_MS,
        }
    }
    
    /// Sets the death-timing slack.
    pub fn with_tolerance(mut self, tolerance_ms: u64) -> Self {
        self.tolerance_ms = tolerance_ms;
        self
    }
    
    /// Counts "is eating" lines per philosopher, in seat order.
    pub fn meals_per_philosopher(&self, transcript: &[StatusLine]) -> Vec<u64> {
        let mut meals = vec![0; self.philosophers];
        for line in transcript.iter().filter(|l| l.status == Status::Eating) {
            if let Some(count) = meals.get_mut(line.philosopher.position()) {
                *count += 1;
            }
        }
        meals
    }
    
    /// Returns every rule the run broke. Empty means the run is valid.
    pub fn check(&self, transcript: &[StatusLine], report: &DinnerReport) -> Vec<Violation> {
        let mut violations = Vec::new();
        
        self.check_sequences(transcript, &mut violations);
        self.check_death(transcript, &mut violations);
        self.check_meals(transcript, report, &mut violations);
        self.check_outcome(transcript, report, &mut violations);
        
        if report.peak_fork_holders > 1 {
            violations.push(Violation::ForkShared(report.peak_fork_holders));
        }
        violations
    }
    
    /// Returns the status allowed to follow `previous` for one philosopher.
    fn successor(&self, previous: Option<Status>) -> Option<Status> {
        match previous {
            None => Some(Status::TakeFirstFork),
            // The lone philosopher never gets a second fork.
            Some(_) if self.philosophers == 1 => None,
            Some(Status::TakeFirstFork) => Some(Status::TakeSecondFork),
            Some(Status::TakeSecondFork) => Some(Status::Eating),
            Some(Status::Eating) => Some(Status::Sleeping),
            Some(Status::Sleeping) => Some(Status::Thinking),
            Some(Status::Thinking) => Some(Status::TakeFirstFork),
            Some(Status::Died) => None,
        }
    }
    
    fn check_sequences(&self, transcript: &[StatusLine], violations: &mut Vec<Violation>) {
        let mut last: Vec<Option<StatusLine>> = vec![None; self.philosophers];
        
        for line in transcript {
            let Some(slot) = last.get_mut(line.philosopher.position()) else {
                continue;
            };
            let previous = *slot;
            
            if let Some(previous) = previous {
                if line.elapsed_ms < previous.elapsed_ms {
                    violations.push(Violation::TimeWentBackwards {
                        philosopher: line.philosopher,
                        previous_ms: previous.elapsed_ms,
                        elapsed_ms: line.elapsed_ms,
                    });
                }
            }
            
            let after = previous.map(|p| p.status);
            if line.status != Status::Died && self.successor(after) != Some(line.status) {
                violations.push(Violation::OutOfOrder {
                    philosopher: line.philosopher,
                    status: line.status,
                    after,
                });
            }
            *slot = Some(*line);
        }
    }
    
    fn check_death(&self, transcript: &[StatusLine], violations: &mut Vec<Violation>) {
        let deaths: Vec<usize> = transcript
            .iter()
            .enumerate()
            .filter(|(_, line)| line.status == Status::Died)
            .map(|(index, _)| index)
            .collect();
        
        if deaths.len() > 1 {
            violations.push(Violation::MultipleDeaths(deaths.len()));
        }
        let Some(&first_death) = deaths.first() else {
            return;
        };
        for index in (first_death + 1)..transcript.len() {
            violations.push(Violation::OutputAfterDeath { index });
        }
        
        let death = transcript[first_death];
        let last_meal_ms = transcript[..first_death]
            .iter()
            .rev()
            .find(|l| l.philosopher == death.philosopher && l.status == Status::Eating)
            .map_or(0, |l| l.elapsed_ms);
        let since_meal_ms = death.elapsed_ms.saturating_sub(last_meal_ms);
        if since_meal_ms + self.tolerance_ms < self.time_to_die_ms {
            violations.push(Violation::DiedTooEarly {
                philosopher: death.philosopher,
                since_meal_ms,
                deadline_ms: self.time_to_die_ms,
            });
        }
    }
    
    fn check_meals(&self, transcript: &[StatusLine], report: &DinnerReport, violations: &mut Vec<Violation>) {
        let Some(cap) = self.meal_cap else {
            return;
        };
        let all_full = report.outcome == DinnerOutcome::AllFull;
        
        for (position, meals) in self.meals_per_philosopher(transcript).into_iter().enumerate() {
            let philosopher = PhilosopherId::from_position(position);
            if meals > cap {
                violations.push(Violation::TooManyMeals { philosopher, meals, cap });
            } else if all_full && meals != cap {
                violations.push(Violation::NotFull { philosopher, meals, cap });
            }
        }
    }
    
    fn check_outcome(&self, transcript: &[StatusLine], report: &DinnerReport, violations: &mut Vec<Violation>) {
        let death = transcript.iter().find(|l| l.status == Status::Died);
        
        let consistent = match report.outcome {
            DinnerOutcome::Death { philosopher, at_ms } => {
                death.is_some_and(|d| d.philosopher == philosopher && d.elapsed_ms == at_ms)
            }
            DinnerOutcome::AllFull | DinnerOutcome::WindowElapsed => death.is_none(),
            DinnerOutcome::Skipped => transcript.is_empty(),
        };
        if !consistent {
            violations.push(Violation::OutcomeMismatch(report.outcome));
        }
    }
}
