//! Error handling and verification statistics.
//!
//! This module provides:
//! - Error type definitions (configuration, registry, initialization)
//! - Failure categories for unavailable signals
//! - Categorization of HTTP client errors
//! - Thread-safe decision and failure counters
//!
//! Only configuration problems are errors in the `Result` sense. Signal
//! failures are data: they degrade one term of the decision and are counted.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::VerificationStats;
pub use types::{
    ConfigError, FailureType, InitializationError, LookupFailure, RegistryError, VerifyError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_verification_stats_initialization() {
        let stats = VerificationStats::new();
        for failure in FailureType::iter() {
            assert_eq!(stats.get_failure_count(failure), 0);
        }
        assert_eq!(stats.total_verifications(), 0);
    }

    #[test]
    fn test_verification_stats_increment() {
        let stats = VerificationStats::new();
        stats.increment_failure(FailureType::GeolocationDenied);
        stats.increment_failure(FailureType::GeolocationDenied);
        stats.increment_failure(FailureType::SpeedTestFailed);
        assert_eq!(stats.get_failure_count(FailureType::GeolocationDenied), 2);
        assert_eq!(stats.total_failures(), 3);
    }

    #[test]
    fn test_verification_stats_decisions() {
        let stats = VerificationStats::new();
        stats.record_decision(true);
        stats.record_decision(false);
        stats.record_decision(false);
        assert_eq!(stats.allowed(), 1);
        assert_eq!(stats.denied(), 2);
        assert_eq!(stats.total_verifications(), 3);
    }

    #[test]
    fn test_failure_type_labels_are_unique() {
        let mut labels: Vec<_> = FailureType::iter().map(|f| f.metric_label()).collect();
        let count = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), count);
    }

    #[test]
    fn test_empty_registry_error_message() {
        let msg = VerifyError::EmptyRegistry.to_string();
        assert!(msg.contains("empty"));
    }
}
