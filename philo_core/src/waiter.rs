//! Precise, interruptible sleeping.

use philo_env::{Clock, StopSignal};
use std::time::Duration;
use std::{hint, thread};

/// Below this many microseconds the waiter stops yielding and spins.
const SPIN_THRESHOLD_US: u64 = 1_000;

/// Sleeps for `duration` with sub-millisecond accuracy.
///
/// While more than a millisecond remains, the thread sleeps for half of the
/// remaining time; the tail is spun out against the clock. `stop` is polled
/// before every sleep so a finished simulation is noticed within half of the
/// remaining time at worst, and within a millisecond near the end.
///
/// Returns `true` if the whole duration elapsed, `false` if `stop` cut it short.
pub fn precise_sleep<S>(clock: &Clock, duration: Duration, stop: &S) -> bool
where
    S: StopSignal + ?Sized,
{
    let target = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
    let start = clock.now_us();
    
    loop {
        let elapsed = clock.now_us().saturating_sub(start);
        if elapsed >= target {
            return true;
        }
        if stop.should_stop() {
            return false;
        }
        
        let remaining = target - elapsed;
        if remaining > SPIN_THRESHOLD_US {
            thread::sleep(Duration::from_micros(remaining / 2));
        } else {
            while clock.now_us().saturating_sub(start) < target {
                hint::spin_loop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;
    
    #[test]
    fn test_precise_sleep_full_duration() {
        let clock = Clock::new();
        let stop = AtomicBool::new(false);
        
        let started = Instant::now();
        let completed = precise_sleep(&clock, Duration::from_millis(20), &stop);
        let elapsed = started.elapsed();
        
        assert!(completed);
        assert!(elapsed >= Duration::from_millis(20));
        assert!(elapsed < Duration::from_millis(200));
    }
    
    #[test]
    fn test_precise_sleep_returns_when_stopped() {
        let clock = Clock::new();
        let stop = AtomicBool::new(true);
        
        let started = Instant::now();
        let completed = precise_sleep(&clock, Duration::from_secs(10), &stop);
        
        assert!(!completed);
        assert!(started.elapsed() < Duration::from_millis(100));
    }
    
    #[test]
    fn test_precise_sleep_notices_stop_midway() {
        let clock = Clock::new();
        let stop = AtomicBool::new(false);
        
        let started = Instant::now();
        let completed = thread::scope(|s| {
            let sleeper = s.spawn(|| precise_sleep(&clock, Duration::from_secs(2), &stop));
            thread::sleep(Duration::from_millis(50));
            stop.store(true, Ordering::Release);
            sleeper.join().unwrap()
        });
        
        assert!(!completed);
        // Half of the remaining ~1.95s is the worst case between polls.
        assert!(started.elapsed() < Duration::from_millis(1_500));
    }
    
    #[test]
    fn test_precise_sleep_zero_duration() {
        let clock = Clock::new();
        assert!(precise_sleep(&clock, Duration::ZERO, &AtomicBool::new(true)));
    }
}
