//! Error type definitions.
//!
//! This module defines the configuration and initialization errors, and the
//! failure categories recorded when a verification signal is unavailable.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::network::CidrParseError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Invalid engine configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An endpoint is not an absolute http(s) URL.
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The throughput threshold is not a positive number.
    #[error("Speed threshold must be a positive number of Mbps, got {0}")]
    InvalidThreshold(f64),

    /// A size or timeout that must be non-zero is zero.
    #[error("Configuration value '{0}' must be greater than zero")]
    ZeroValue(&'static str),
}

/// Office registry rejected at load time.
///
/// A malformed entry never reaches match time, so it can neither silently match
/// everything nor silently match nothing.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An office has an empty (or whitespace-only) name.
    #[error("Office at position {0} has an empty name")]
    EmptyName(usize),

    /// Two offices share the same name.
    #[error("Duplicate office name '{0}'")]
    DuplicateName(String),

    /// An `allowedNetworks` entry is not a valid IPv4 CIDR block.
    #[error("Office '{office}': invalid network '{entry}': {source}")]
    InvalidNetwork {
        office: String,
        entry: String,
        #[source]
        source: CidrParseError,
    },

    /// An `allowedIPs` entry is not an IP address.
    #[error("Office '{office}': invalid allowed IP '{entry}'")]
    InvalidIp { office: String, entry: String },

    /// Geofence radius is not a positive, finite number of meters.
    #[error("Office '{office}': geofence radius must be positive, got {radius}")]
    InvalidRadius { office: String, radius: f64 },

    /// Latitude/longitude outside the valid ranges.
    #[error("Office '{office}': coordinates ({latitude}, {longitude}) are out of range")]
    InvalidCoordinates {
        office: String,
        latitude: f64,
        longitude: f64,
    },

    /// The registry file could not be read.
    #[error("Failed to read office registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The registry document is not valid JSON for the registry schema.
    #[error("Failed to parse office registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Programmer errors surfaced when building a verification engine.
///
/// Network and device failures are never reported through this type; they
/// degrade individual signals instead.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// A non-permissive registry without offices can never allow a check-in.
    #[error("Office registry is empty; at least one office is required unless the registry is permissive")]
    EmptyRegistry,

    /// Invalid engine configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Shared resources could not be initialized.
    #[error(transparent)]
    Initialization(#[from] InitializationError),
}

/// Reasons a verification signal ended up unavailable.
///
/// Recorded per verification so operators can see which signal source is flaky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureType {
    // Public IP
    IpLookupUnavailable, // every lookup endpoint failed
    // Geolocation
    GeolocationDenied,
    GeolocationUnsupported,
    GeolocationTimeout,
    GeolocationUnavailable,
    // Network quality
    SpeedTestFailed,
}

impl std::fmt::Display for FailureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureType::IpLookupUnavailable => "IP lookup unavailable",
            FailureType::GeolocationDenied => "Geolocation permission denied",
            FailureType::GeolocationUnsupported => "Geolocation unsupported",
            FailureType::GeolocationTimeout => "Geolocation timeout",
            FailureType::GeolocationUnavailable => "Geolocation unavailable",
            FailureType::SpeedTestFailed => "Speed test failed",
        }
    }

    /// Metric label used by the `/metrics` endpoint.
    pub fn metric_label(&self) -> &'static str {
        match self {
            FailureType::IpLookupUnavailable => "ip_lookup_unavailable",
            FailureType::GeolocationDenied => "geolocation_denied",
            FailureType::GeolocationUnsupported => "geolocation_unsupported",
            FailureType::GeolocationTimeout => "geolocation_timeout",
            FailureType::GeolocationUnavailable => "geolocation_unavailable",
            FailureType::SpeedTestFailed => "speed_test_failed",
        }
    }
}

/// Why a single HTTP lookup attempt failed.
///
/// Used for log messages; one failed attempt does not make a signal unavailable
/// as long as a later endpoint answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    Timeout,
    Connect,
    Status(u16),
    Body,
    NoIpField,
    Other(String),
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::Timeout => f.write_str("request timed out"),
            LookupFailure::Connect => f.write_str("connection failed"),
            LookupFailure::Status(code) => write!(f, "unexpected HTTP status {code}"),
            LookupFailure::Body => f.write_str("failed to read response body"),
            LookupFailure::NoIpField => f.write_str("response did not contain an IP address"),
            LookupFailure::Other(msg) => write!(f, "request failed: {msg}"),
        }
    }
}
