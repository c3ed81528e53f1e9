//! Combination policy.
//!
//! A recognized office IP is sufficient on its own. Without one, GPS proximity
//! must be corroborated by the network-quality signal.

use crate::config::{ERROR_NOT_IN_OFFICE, ERROR_UNABLE_TO_VERIFY};
use crate::models::SignalOutcome;

use super::types::SignalReport;

/// `ip_allowed || (gps_allowed && network_trusted)`
pub fn combine(ip_allowed: bool, gps_allowed: bool, network_trusted: bool) -> bool {
    ip_allowed || (gps_allowed && network_trusted)
}

/// Folds the tri-state signals into the final decision and user-facing error.
///
/// Unavailable IP and GPS count as not allowed; an unavailable network probe
/// counts as trusted.
pub fn decide(report: &SignalReport) -> (bool, Option<String>) {
    let allowed = combine(
        report.ip.resolve(false),
        report.gps.resolve(false),
        report.network.resolve(true),
    );

    if allowed {
        return (true, None);
    }

    let nothing_known =
        report.ip == SignalOutcome::Unavailable && report.gps == SignalOutcome::Unavailable;
    let message = if nothing_known {
        ERROR_UNABLE_TO_VERIFY
    } else {
        ERROR_NOT_IN_OFFICE
    };
    (false, Some(message.to_string()))
}
