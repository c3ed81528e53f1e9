use serde::{Deserialize, Serialize};

/// Tri-state result of one verification signal.
///
/// `Unavailable` means the signal could not be obtained at all and must not be
/// read as `Denied`; each signal decides for itself how an absent reading folds
/// into the final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalOutcome {
    Allowed,
    Denied,
    Unavailable,
}

impl SignalOutcome {
    /// Collapses the tri-state to a boolean, mapping `Unavailable` to
    /// `when_unavailable`.
    pub fn resolve(self, when_unavailable: bool) -> bool {
        match self {
            SignalOutcome::Allowed => true,
            SignalOutcome::Denied => false,
            SignalOutcome::Unavailable => when_unavailable,
        }
    }

    pub fn from_bool(allowed: bool) -> Self {
        if allowed {
            SignalOutcome::Allowed
        } else {
            SignalOutcome::Denied
        }
    }
}

impl std::fmt::Display for SignalOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SignalOutcome::Allowed => "allowed",
            SignalOutcome::Denied => "denied",
            SignalOutcome::Unavailable => "unavailable",
        })
    }
}
