//! Scenario catalog for the harness.

use philo_core::{ConfigError, DinnerConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Observation window for the fixed survival scenarios.
const SURVIVAL_WINDOW: Duration = Duration::from_millis(1_500);

/// Observation window for the randomized scenario.
const RANDOM_WINDOW: Duration = Duration::from_millis(800);

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// PH-001: one philosopher, one fork, certain death
    LonePhilosopher,
    
    /// PH-002: 4 410 200 200, the classic tight-but-survivable table
    EvenTable,
    
    /// PH-003: 5 800 200 200, odd table relying on the thinking delay
    OddTable,
    
    /// PH-004: 5 800 200 200 3, everybody eats exactly three times
    MealCap,
    
    /// PH-005: 4 310 200 100, deadline shorter than a neighbour's turn
    Starvation,
    
    /// PH-006: meal cap of zero, nothing runs
    ZeroMeals,
    
    /// PH-007: seeded random table, universal invariants only
    Random,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::LonePhilosopher,
            ScenarioId::EvenTable,
            ScenarioId::OddTable,
            ScenarioId::MealCap,
            ScenarioId::Starvation,
            ScenarioId::ZeroMeals,
            ScenarioId::Random,
        ]
    }
    
    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::LonePhilosopher => "lone_philosopher",
            ScenarioId::EvenTable => "even_table",
            ScenarioId::OddTable => "odd_table",
            ScenarioId::MealCap => "meal_cap",
            ScenarioId::Starvation => "starvation",
            ScenarioId::ZeroMeals => "zero_meals",
            ScenarioId::Random => "random",
        }
    }
    
    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::LonePhilosopher => "1 philosopher: takes one fork, never eats, dies after 800ms",
            ScenarioId::EvenTable => "4 410 200 200: nobody dies, at least two meals each",
            ScenarioId::OddTable => "5 800 200 200: nobody dies on an odd table",
            ScenarioId::MealCap => "5 800 200 200 3: everybody full after exactly three meals",
            ScenarioId::Starvation => "4 310 200 100: somebody starves, no earlier than the deadline",
            ScenarioId::ZeroMeals => "5 800 200 200 0: no thread, no output",
            ScenarioId::Random => "seeded random table: ordering, exclusion and timing invariants",
        }
    }
    
    /// True when the outcome depends on the seed.
    pub fn is_seeded(&self) -> bool {
        matches!(self, ScenarioId::Random)
    }
    
    /// Builds the dinner configuration of this scenario.
    ///
    /// Only `Random` looks at `seed`.
    pub fn config(&self, seed: u64) -> Result<DinnerConfig, ConfigError> {
        let config = match self {
            ScenarioId::LonePhilosopher => DinnerConfig::from_millis(1, 800, 200, 200)?,
            ScenarioId::EvenTable => DinnerConfig::from_millis(4, 410, 200, 200)?
                .with_observation_window(SURVIVAL_WINDOW),
            ScenarioId::OddTable => DinnerConfig::from_millis(5, 800, 200, 200)?
                .with_observation_window(SURVIVAL_WINDOW),
            ScenarioId::MealCap => DinnerConfig::from_millis(5, 800, 200, 200)?.with_meal_cap(3),
            ScenarioId::Starvation => DinnerConfig::from_millis(4, 310, 200, 100)?,
            ScenarioId::ZeroMeals => DinnerConfig::from_millis(5, 800, 200, 200)?.with_meal_cap(0),
            ScenarioId::Random => random_config(seed)?,
        };
        Ok(config)
    }
}

/// Draws a table from `seed`: 1 to 8 seats, phases of 60 to 400ms, and
/// half of the time a cap of 1 to 5 meals.
fn random_config(seed: u64) -> Result<DinnerConfig, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    
    let philosophers = rng.gen_range(1..=8);
    let time_to_die = rng.gen_range(60..=400);
    let time_to_eat = rng.gen_range(60..=400);
    let time_to_sleep = rng.gen_range(60..=400);
    
    let mut config = DinnerConfig::from_millis(philosophers, time_to_die, time_to_eat, time_to_sleep)?
        .with_observation_window(RANDOM_WINDOW);
    if rng.gen_bool(0.5) {
        config = config.with_meal_cap(rng.gen_range(1..=5));
    }
    Ok(config)
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lone_philosopher" | "lone" | "ph-001" => Ok(ScenarioId::LonePhilosopher),
            "even_table" | "even" | "ph-002" => Ok(ScenarioId::EvenTable),
            "odd_table" | "odd" | "ph-003" => Ok(ScenarioId::OddTable),
            "meal_cap" | "mealcap" | "ph-004" => Ok(ScenarioId::MealCap),
            "starvation" | "ph-005" => Ok(ScenarioId::Starvation),
            "zero_meals" | "zeromeals" | "ph-006" => Ok(ScenarioId::ZeroMeals),
            "random" | "ph-007" => Ok(ScenarioId::Random),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
