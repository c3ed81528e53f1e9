//! Verification statistics tracking.
//!
//! Thread-safe counters for verification decisions and unavailable signals,
//! shared between the engine and the status server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureType;

/// Thread-safe verification statistics tracker.
///
/// All failure types are initialized to zero on creation so lookups never miss.
/// Share across tasks with `Arc`.
#[derive(Debug)]
pub struct VerificationStats {
    allowed: AtomicUsize,
    denied: AtomicUsize,
    failures: HashMap<FailureType, AtomicUsize>,
}

impl Default for VerificationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationStats {
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for failure in FailureType::iter() {
            failures.insert(failure, AtomicUsize::new(0));
        }

        VerificationStats {
            allowed: AtomicUsize::new(0),
            denied: AtomicUsize::new(0),
            failures,
        }
    }

    /// Records the final decision of one verification.
    pub fn record_decision(&self, allowed: bool) {
        if allowed {
            self.allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.denied.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Increment a failure counter.
    pub fn increment_failure(&self, failure: FailureType) {
        if let Some(counter) = self.failures.get(&failure) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map",
                failure
            );
        }
    }

    /// Get the count for a failure type.
    pub fn get_failure_count(&self, failure: FailureType) -> usize {
        self.failures
            .get(&failure)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Number of verifications that allowed a check-in.
    pub fn allowed(&self) -> usize {
        self.allowed.load(Ordering::SeqCst)
    }

    /// Number of verifications that denied a check-in.
    pub fn denied(&self) -> usize {
        self.denied.load(Ordering::SeqCst)
    }

    /// Total number of settled verifications.
    pub fn total_verifications(&self) -> usize {
        self.allowed() + self.denied()
    }

    /// Get total failure count across all failure types.
    pub fn total_failures(&self) -> usize {
        FailureType::iter().map(|f| self.get_failure_count(f)).sum()
    }
}
