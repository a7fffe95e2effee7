//! Dinner configuration.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// A configuration the engine refuses to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The table needs at least one philosopher
    #[error("at least one philosopher is required")]
    NoPhilosophers,
    
    /// One of the three phase durations is zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Immutable parameters of one dinner, shared by every thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DinnerConfig {
    philosophers: usize,
    time_to_die: Duration,
    time_to_eat: Duration,
    time_to_sleep: Duration,
    meal_cap: Option<u64>,
    observation_window: Option<Duration>,
}

impl DinnerConfig {
    /// Creates a configuration with no meal cap and no observation window.
    pub fn new(
        philosophers: usize,
        time_to_die: Duration,
        time_to_eat: Duration,
        time_to_sleep: Duration,
    ) -> Result<Self, ConfigError> {
        if philosophers == 0 {
            return Err(ConfigError::NoPhilosophers);
        }
        for (name, value) in [
            ("time_to_die", time_to_die),
            ("time_to_eat", time_to_eat),
            ("time_to_sleep", time_to_sleep),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        
        Ok(Self {
            philosophers,
            time_to_die,
            time_to_eat,
            time_to_sleep,
            meal_cap: None,
            observation_window: None,
        })
    }
    
    /// Same as `new` with all durations in milliseconds.
    pub fn from_millis(
        philosophers: usize,
        time_to_die_ms: u64,
        time_to_eat_ms: u64,
        time_to_sleep_ms: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            philosophers,
            Duration::from_millis(time_to_die_ms),
            Duration::from_millis(time_to_eat_ms),
            Duration::from_millis(time_to_sleep_ms),
        )
    }
    
    /// Sets how many meals make a philosopher full.
    ///
    /// A cap of zero means the dinner does not run at all.
    pub fn with_meal_cap(mut self, meals: u64) -> Self {
        self.meal_cap = Some(meals);
        self
    }
    
    /// Ends a death-free dinner once `window` has elapsed since the start.
    pub fn with_observation_window(mut self, window: Duration) -> Self {
        self.observation_window = Some(window);
        self
    }
    
    /// Number of philosophers (and forks).
    pub fn philosophers(&self) -> usize {
        self.philosophers
    }
    
    pub fn time_to_die(&self) -> Duration {
        self.time_to_die
    }
    
    pub fn time_to_eat(&self) -> Duration {
        self.time_to_eat
    }
    
    pub fn time_to_sleep(&self) -> Duration {
        self.time_to_sleep
    }
    
    /// Deadline in whole milliseconds, as the monitor compares it.
    pub fn time_to_die_ms(&self) -> u64 {
        u64::try_from(self.time_to_die.as_millis()).unwrap_or(u64::MAX)
    }
    
    pub fn meal_cap(&self) -> Option<u64> {
        self.meal_cap
    }
    
    pub fn observation_window(&self) -> Option<Duration> {
        self.observation_window
    }
    
    /// True when an odd-sized table needs the thinking delay.
    pub fn is_odd_table(&self) -> bool {
        self.philosophers % 2 == 1
    }
    
    /// True when the meal cap is zero and no thread should start.
    pub fn is_no_op(&self) -> bool {
        self.meal_cap == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_config_from_millis() {
        let config = DinnerConfig::from_millis(4, 410, 200, 200).unwrap();
        
        assert_eq!(config.philosophers(), 4);
        assert_eq!(config.time_to_die_ms(), 410);
        assert_eq!(config.time_to_eat(), Duration::from_millis(200));
        assert_eq!(config.meal_cap(), None);
        assert!(!config.is_odd_table());
        assert!(!config.is_no_op());
    }
    
    #[test]
    fn test_config_rejects_empty_table() {
        assert_eq!(
            DinnerConfig::from_millis(0, 410, 200, 200),
            Err(ConfigError::NoPhilosophers)
        );
    }
    
    #[test]
    fn test_config_rejects_zero_durations() {
        assert_eq!(
            DinnerConfig::from_millis(3, 410, 0, 200),
            Err(ConfigError::ZeroDuration("time_to_eat"))
        );
    }
    
    #[test]
    fn test_zero_meal_cap_is_no_op() {
        let config = DinnerConfig::from_millis(5, 800, 200, 200)
            .unwrap()
            .with_meal_cap(0);
        
        assert!(config.is_no_op());
        assert!(config.is_odd_table());
    }
}
