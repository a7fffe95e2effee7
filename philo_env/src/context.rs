//! Cooperative cancellation seam.

use std::sync::atomic::{AtomicBool, Ordering};

/// Something every blocking wait in the engine polls.
///
/// Cancellation is cooperative only: a wait that sees `should_stop()`
/// return true gives up whatever time it had left and returns.
pub trait StopSignal: Sync {
    /// Returns true once the simulation has ended.
    fn should_stop(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<S: StopSignal + ?Sized> StopSignal for &S {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}
