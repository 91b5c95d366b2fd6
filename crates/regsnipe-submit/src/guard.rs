//! Single-flight guard.
//!
//! At most one registration submission may be in flight at a time, no
//! matter how many rapid-fire ticks arrive. Ticks that find the guard held
//! are dropped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the in-flight slot. Returns false if an attempt already holds it.
    pub fn try_acquire(&self) -> bool {
        !self.in_flight.swap(true, Ordering::AcqRel)
    }

    /// Release the slot. Called on every recoverable exit path; terminal
    /// outcomes keep the guard held because the run is over.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn is_held(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}
