//! Forks: the shared resources between neighbouring philosophers.

use crate::sync::lock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// One fork. Fork `i` lies between philosopher `i + 1` and philosopher
/// `i + 2` (mod N), so every fork is shared by exactly two neighbours.
///
/// Besides the lock, each fork keeps counters that make the mutual
/// exclusion observable: how often it was picked up, and the highest number
/// of simultaneous holders ever seen (must stay at 1).
#[derive(Debug)]
pub struct Fork {
    id: usize,
    lock: Mutex<()>,
    holders: AtomicUsize,
    peak_holders: AtomicUsize,
    pickups: AtomicU64,
}

/// Proof of holding a fork. Dropping it puts the fork back on the table.
#[derive(Debug)]
pub struct ForkGuard<'a> {
    fork: &'a Fork,
    _held: MutexGuard<'a, ()>,
}

impl Fork {
    /// Creates fork number `id` (0-based).
    pub fn new(id: usize) -> Self {
        Self {
            id,
            lock: Mutex::new(()),
            holders: AtomicUsize::new(0),
            peak_holders: AtomicUsize::new(0),
            pickups: AtomicU64::new(0),
        }
    }
    
    /// Returns the fork index.
    pub fn id(&self) -> usize {
        self.id
    }
    
    /// Blocks until the fork is free, then holds it until the guard drops.
    pub fn take(&self) -> ForkGuard<'_> {
        let held = lock(&self.lock);
        let holders = self.holders.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_holders.fetch_max(holders, Ordering::AcqRel);
        self.pickups.fetch_add(1, Ordering::Relaxed);
        
        ForkGuard {
            fork: self,
            _held: held,
        }
    }
    
    /// Number of times the fork has been picked up.
    pub fn pickups(&self) -> u64 {
        self.pickups.load(Ordering::Relaxed)
    }
    
    /// Highest number of simultaneous holders observed.
    pub fn peak_holders(&self) -> usize {
        self.peak_holders.load(Ordering::Acquire)
    }
}

impl ForkGuard<'_> {
    /// Index of the held fork.
    pub fn fork_id(&self) -> usize {
        self.fork.id
    }
}

impl Drop for ForkGuard<'_> {
    fn drop(&mut self) {
        // Runs before `_held` is dropped, i.e. while the lock is still held.
        self.fork.holders.fetch_sub(1, Ordering::AcqRel);
    }
}
