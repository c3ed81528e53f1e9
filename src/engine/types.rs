//! Verification result and state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SignalOutcome;
use crate::resolver::LocationInfo;

/// Per-signal diagnostics attached to a settled result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub ip: SignalOutcome,
    pub gps: SignalOutcome,
    pub network: SignalOutcome,
    /// Office matched by IP, or failing that by geofence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_office: Option<String>,
    /// Distance to the nearest office when a GPS fix was available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput_mbps: Option<f64>,
}

/// UI-facing verification state.
///
/// Immutable once produced; each `verify()` call produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_in_office_network: bool,
    pub current_location: Option<LocationInfo>,
    pub is_checking: bool,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<SignalReport>,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
}

impl VerificationResult {
    /// Nothing verified yet.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A verification is in flight; no decision or error is exposed meanwhile.
    pub fn checking() -> Self {
        Self {
            is_checking: true,
            ..Self::default()
        }
    }

    /// The state this result represents.
    pub fn state(&self) -> VerificationState {
        if self.is_checking {
            VerificationState::Checking
        } else if self.checked_at.is_none() {
            VerificationState::Idle
        } else if self.is_in_office_network {
            VerificationState::Allowed
        } else {
            VerificationState::Denied
        }
    }
}

/// `Idle -> Checking -> {Allowed, Denied}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    Idle,
    Checking,
    Allowed,
    Denied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states() {
        assert_eq!(VerificationResult::idle().state(), VerificationState::Idle);
        assert_eq!(
            VerificationResult::checking().state(),
            VerificationState::Checking
        );

        let mut settled = VerificationResult {
            checked_at: Some(Utc::now()),
            ..Default::default()
        };
        assert_eq!(settled.state(), VerificationState::Denied);
        settled.is_in_office_network = true;
        assert_eq!(settled.state(), VerificationState::Allowed);
    }

    #[test]
    fn test_checking_exposes_no_decision() {
        let checking = VerificationResult::checking();
        assert!(!checking.is_in_office_network);
        assert!(checking.error.is_none());
        assert!(checking.current_location.is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = VerificationResult {
            is_in_office_network: true,
            current_location: Some(LocationInfo::from_ip("10.0.5.7")),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isInOfficeNetwork"], true);
        assert_eq!(json["isChecking"], false);
        assert_eq!(json["currentLocation"]["ip"], "10.0.5.7");
        assert!(json["error"].is_null());
        assert!(json.get("signals").is_none());
    }
}
