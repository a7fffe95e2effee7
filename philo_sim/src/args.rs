//! Command-line argument validation.
//!
//! The engine trusts its configuration; this module is where user input is
//! checked. Numbers are plain decimal: optional leading blanks, an optional
//! `+`, then digits only, and no larger than `i32::MAX`.

use philo_core::{ConfigError, DinnerConfig};
use std::time::Duration;
use thiserror::Error;

/// Shortest accepted phase duration, in milliseconds.
pub const MIN_PHASE_MS: u64 = 60;

/// Largest accepted numeric argument.
pub const MAX_ARG: u64 = i32::MAX as u64;

/// A rejected command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("Expected numbers (got '{0}')")]
    NotANumber(String),
    
    #[error("Only positive numbers is accepted (got '{0}')")]
    Negative(String),
    
    #[error("Numbers can't be higher than INT MAX (got '{0}')")]
    TooLarge(String),
    
    #[error("Expected 4 or 5 arguments, got {0}")]
    WrongCount(usize),
    
    #[error("Expected minimum 1 philosopher to work")]
    NoPhilosophers,
    
    #[error("> 60ms expected for the program to work ({name} = {value}ms)")]
    BelowFloor { name: &'static str, value: u64 },
    
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parses one numeric argument.
pub fn parse_number(raw: &str) -> Result<u64, ArgError> {
    let trimmed = raw.trim_start_matches([' ', '\t']);
    if trimmed.starts_with('-') {
        return Err(ArgError::Negative(raw.to_string()));
    }
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ArgError::NotANumber(raw.to_string()));
    }
    
    let mut value: u64 = 0;
    for digit in digits.bytes() {
        value = value * 10 + u64::from(digit - b'0');
        if value > MAX_ARG {
            return Err(ArgError::TooLarge(raw.to_string()));
        }
    }
    Ok(value)
}

/// Turns the positional arguments into a dinner configuration.
///
/// `values` is `count die eat sleep [meals]`. Syntax is checked for all four
/// mandatory values first, then the philosopher count, then the 60ms floor,
/// and finally the optional meal cap.
pub fn parse_dinner(values: &[String], window: Option<Duration>) -> Result<DinnerConfig, ArgError> {
    if !(4..=5).contains(&values.len()) {
        return Err(ArgError::WrongCount(values.len()));
    }
    
    let philosophers = parse_number(&values[0])?;
    let time_to_die = parse_number(&values[1])?;
    let time_to_eat = parse_number(&values[2])?;
    let time_to_sleep = parse_number(&values[3])?;
    
    if philosophers == 0 {
        return Err(ArgError::NoPhilosophers);
    }
    for (name, value) in [
        ("time_to_die", time_to_die),
        ("time_to_eat", time_to_eat),
        ("time_to_sleep", time_to_sleep),
    ] {
        if value < MIN_PHASE_MS {
            return Err(ArgError::BelowFloor { name, value });
        }
    }
    
    // Bounded by MAX_ARG, so the count always fits.
    let count = usize::try_from(philosophers).map_err(|_| ArgError::TooLarge(values[0].clone()))?;
    let mut config = DinnerConfig::from_millis(count, time_to_die, time_to_eat, time_to_sleep)?;
    if let Some(meals) = values.get(4) {
        config = config.with_meal_cap(parse_number(meals)?);
    }
    if let Some(window) = window {
        config = config.with_observation_window(window);
    }
    Ok(config)
}
