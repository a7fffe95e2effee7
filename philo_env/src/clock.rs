//! Monotonic wall clock with selectable resolution.

use std::time::Instant;

/// Resolution for `Clock::now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
}

/// Elapsed-time source shared by every thread of a simulation.
///
/// Readings are measured from an arbitrary epoch captured at construction.
/// Only differences between readings are meaningful.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    /// Creates a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
    
    /// Returns the time elapsed since the epoch in the given unit.
    pub fn now(&self, unit: TimeUnit) -> u64 {
        let elapsed = self.epoch.elapsed();
        match unit {
            TimeUnit::Second => elapsed.as_secs(),
            TimeUnit::Millisecond => saturate(elapsed.as_millis()),
            TimeUnit::Microsecond => saturate(elapsed.as_micros()),
        }
    }
    
    /// Shorthand for `now(TimeUnit::Millisecond)`.
    pub fn now_ms(&self) -> u64 {
        self.now(TimeUnit::Millisecond)
    }
    
    /// Shorthand for `now(TimeUnit::Microsecond)`.
    pub fn now_us(&self) -> u64 {
        self.now(TimeUnit::Microsecond)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    
    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new();
        let t1 = clock.now_us();
        std::thread::sleep(Duration::from_millis(2));
        let t2 = clock.now_us();
        
        assert!(t2 > t1);
        assert!(t2 - t1 >= 2_000);
    }
    
    #[test]
    fn test_clock_units_agree() {
        let clock = Clock::new();
        std::thread::sleep(Duration::from_millis(15));
        
        let ms = clock.now(TimeUnit::Millisecond);
        let us = clock.now(TimeUnit::Microsecond);
        
        assert!(ms >= 15);
        assert!(us / 1_000 >= ms);
        assert_eq!(clock.now(TimeUnit::Second), 0);
    }
    
    #[test]
    fn test_copied_clock_shares_epoch() {
        let clock = Clock::new();
        let copy = clock;
        std::thread::sleep(Duration::from_millis(5));
        
        assert!(copy.now_ms().abs_diff(clock.now_ms()) <= 1);
    }
}
