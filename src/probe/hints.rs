//! Connection-type hints.
//!
//! Platforms expose the link type in different ways (and browsers under vendor
//! prefixes); all of them reduce to a `ConnectionHint` supplied by a
//! `NetworkHintProvider`.

use strum_macros::EnumString;

/// Link type reported by the platform, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ConnectionHint {
    /// No hint available
    #[default]
    #[strum(serialize = "unknown", serialize = "none", serialize = "")]
    Unknown,
    /// Mobile data link. Never trusted.
    #[strum(serialize = "cellular", serialize = "mobile")]
    Cellular,
    #[strum(serialize = "wifi", serialize = "wi-fi")]
    Wifi,
    #[strum(serialize = "ethernet")]
    Ethernet,
    /// Any other platform-specific value (e.g. "bluetooth", "wimax")
    #[strum(default)]
    Other(String),
}

impl ConnectionHint {
    pub fn as_str(&self) -> &str {
        match self {
            ConnectionHint::Unknown => "unknown",
            ConnectionHint::Cellular => "cellular",
            ConnectionHint::Wifi => "wifi",
            ConnectionHint::Ethernet => "ethernet",
            ConnectionHint::Other(value) => value,
        }
    }

    pub fn is_cellular(&self) -> bool {
        matches!(self, ConnectionHint::Cellular)
    }
}

impl std::fmt::Display for ConnectionHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of connection-type hints.
pub trait NetworkHintProvider: Send + Sync {
    fn connection_hint(&self) -> ConnectionHint;
}

/// A fixed hint is its own provider.
impl NetworkHintProvider for ConnectionHint {
    fn connection_hint(&self) -> ConnectionHint {
        self.clone()
    }
}
