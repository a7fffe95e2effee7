//! Scenario runner - executes dinners and checks them against the oracle.

use crate::oracle::{Oracle, Violation, DEFAULT_TOLERANCE_MS};
use crate::recorder::RecordingSink;
use crate::scenarios::ScenarioId;

use philo_core::{Dinner, DinnerConfig, DinnerError, DinnerOutcome, DinnerReport};
use philo_env::{PhilosopherId, StatusLine};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,
    
    /// Seed used
    pub seed: u64,
    
    /// Whether the run obeyed every rule and met the scenario's expectation
    pub passed: bool,
    
    /// How the dinner ended, if it ran at all
    pub outcome: Option<DinnerOutcome>,
    
    /// Failure message if any
    pub failure_reason: Option<String>,
    
    /// Rules the transcript broke
    pub violations: Vec<Violation>,
    
    /// Recorded status lines
    pub transcript: Vec<StatusLine>,
    
    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Status lines printed
    pub lines: usize,
    
    /// Meals per philosopher, in seat order
    pub meals: Vec<u64>,
    
    /// Fork pickups over all forks
    pub fork_pickups: u64,
    
    /// Highest simultaneous holder count seen on any fork
    pub peak_fork_holders: usize,
    
    /// Wall-clock duration (ms)
    pub elapsed_ms: u64,
}

impl ScenarioMetrics {
    fn from_report(report: &DinnerReport, lines: usize) -> Self {
        Self {
            lines,
            meals: report.meals.clone(),
            fork_pickups: report.fork_pickups.iter().sum(),
            peak_fork_holders: report.peak_fork_holders,
            elapsed_ms: report.elapsed_ms,
        }
    }
}

/// Runs one dinner into a recorder and returns its report and transcript.
///
/// With `echo` set, the lines are printed to stdout as they happen.
pub fn record_dinner(
    config: DinnerConfig,
    echo: bool,
) -> Result<(DinnerReport, Vec<StatusLine>), DinnerError> {
    let recorder = if echo {
        RecordingSink::echoing()
    } else {
        RecordingSink::new()
    };
    let report = Dinner::new(config, Box::new(recorder.clone())).run()?;
    Ok((report, recorder.transcript()))
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// Seed for seeded scenarios
    seed: u64,
    
    /// Death-timing slack handed to the oracle
    tolerance_ms: u64,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tolerance_ms: DEFAULT_TOLERANCE_MS,
        }
    }
    
    /// Sets the death-timing slack.
    pub fn with_tolerance(mut self, tolerance_ms: u64) -> Self {
        self.tolerance_ms = tolerance_ms;
        self
    }
    
    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        
        let config = match scenario.config(self.seed) {
            Ok(config) => config,
            Err(err) => return self.aborted(scenario, format!("invalid configuration: {}", err)),
        };
        debug!("  Config: {:?}", config);
        
        let (report, transcript) = match record_dinner(config.clone(), false) {
            Ok(recorded) => recorded,
            Err(err) => return self.aborted(scenario, format!("dinner failed: {}", err)),
        };
        
        let violations = Oracle::new(&config)
            .with_tolerance(self.tolerance_ms)
            .check(&transcript, &report);
        for violation in &violations {
            warn!("  Violation: {}", violation);
        }
        
        let expectation = check_expectation(scenario, &report);
        let failure_reason = match (&expectation, violations.first()) {
            (Err(reason), _) => Some(reason.clone()),
            (Ok(()), Some(violation)) => Some(format!(
                "{} ({} violation(s) in total)",
                violation,
                violations.len()
            )),
            (Ok(()), None) => None,
        };
        
        debug!("  Outcome: {:?}, meals: {:?}", report.outcome, report.meals);
        
        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure_reason.is_none(),
            outcome: Some(report.outcome),
            failure_reason,
            violations,
            metrics: ScenarioMetrics::from_report(&report, transcript.len()),
            transcript,
        }
    }
    
    fn aborted(&self, scenario: ScenarioId, reason: String) -> ScenarioResult {
        warn!("  Scenario {} aborted: {}", scenario.name(), reason);
        ScenarioResult {
            scenario,
            seed: self.seed,
            passed: false,
            outcome: None,
            failure_reason: Some(reason),
            violations: Vec::new(),
            transcript: Vec::new(),
            metrics: ScenarioMetrics::default(),
        }
    }
}

/// Checks the scenario-specific expectation on top of the universal rules.
fn check_expectation(scenario: ScenarioId, report: &DinnerReport) -> Result<(), String> {
    let outcome = report.outcome;
    let ok = match scenario {
        ScenarioId::LonePhilosopher => matches!(
            outcome,
            DinnerOutcome::Death { philosopher, .. } if philosopher == PhilosopherId::new(1)
        ),
        ScenarioId::EvenTable => {
            if outcome == DinnerOutcome::WindowElapsed && report.min_meals() < 2 {
                return Err(format!("only {} meal(s) for the hungriest philosopher", report.min_meals()));
            }
            outcome == DinnerOutcome::WindowElapsed
        }
        ScenarioId::OddTable => outcome == DinnerOutcome::WindowElapsed,
        ScenarioId::MealCap => outcome == DinnerOutcome::AllFull,
        ScenarioId::Starvation => matches!(outcome, DinnerOutcome::Death { .. }),
        ScenarioId::ZeroMeals => outcome == DinnerOutcome::Skipped,
        ScenarioId::Random => true,
    };
    
    if ok {
        Ok(())
    } else {
        Err(format!("unexpected outcome {:?}", outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use philo_env::Status;
    
    #[test]
    fn test_lone_philosopher_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::LonePhilosopher);
        
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.lines, 2);
        assert_eq!(result.metrics.meals, vec![0]);
    }
    
    #[test]
    fn test_even_table_survives_two_cycles() {
        let result = ScenarioRunner::new(42).run(ScenarioId::EvenTable);
        
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.outcome, Some(DinnerOutcome::WindowElapsed));
        assert!(result.metrics.meals.iter().all(|&meals| meals >= 2), "{:?}", result.metrics.meals);
        assert!(result.transcript.iter().all(|l| l.status != Status::Died));
        assert_eq!(result.metrics.peak_fork_holders, 1);
    }
    
    #[test]
    fn test_zero_meals_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::ZeroMeals);
        
        assert!(result.passed);
        assert_eq!(result.outcome, Some(DinnerOutcome::Skipped));
        assert!(result.transcript.is_empty());
        assert_eq!(result.metrics.fork_pickups, 0);
    }
    
    #[test]
    fn test_meal_cap_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::MealCap);
        
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.meals, vec![3; 5]);
        assert_eq!(result.metrics.peak_fork_holders, 1);
        // Two fork lines per meal.
        let forks = result.transcript.iter().filter(|l| l.status.is_fork()).count();
        assert_eq!(forks, 30);
    }
    
    #[test]
    fn test_starvation_scenario() {
        let result = ScenarioRunner::new(42).run(ScenarioId::Starvation);
        
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.transcript.last().map(|l| l.status), Some(Status::Died));
    }
    
    #[test]
    fn test_random_scenario_holds_invariants() {
        for seed in 0..3 {
            let result = ScenarioRunner::new(seed)
                .with_tolerance(20)
                .run(ScenarioId::Random);
            assert!(result.passed, "seed {}: {:?}", seed, result.failure_reason);
        }
    }
    
    #[test]
    fn test_expectation_mismatch_fails() {
        let report = DinnerReport {
            outcome: DinnerOutcome::WindowElapsed,
            meals: vec![1, 5, 5, 5],
            fork_pickups: vec![0; 4],
            peak_fork_holders: 1,
            lines_written: 0,
            elapsed_ms: 0,
        };
        
        assert!(check_expectation(ScenarioId::EvenTable, &report).is_err());
        assert!(check_expectation(ScenarioId::OddTable, &report).is_ok());
        assert!(check_expectation(ScenarioId::Starvation, &report).is_err());
    }
}
