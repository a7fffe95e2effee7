//! Lock helpers shared by the engine.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// Every value the engine guards is a plain scalar or a sink with no
/// multi-step invariant, so a poisoned value is still consistent. The panic
/// itself is reported when the panicking thread is joined.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
