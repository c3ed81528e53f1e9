//! Configuration constants.
//!
//! This module defines the defaults used throughout the verification engine,
//! including lookup endpoints, timeouts, and signal thresholds.

use std::time::Duration;

// Public IP lookup
/// Ordered list of public IP lookup services tried by the resolver.
///
/// Each provider uses a slightly different JSON shape; the resolver normalizes
/// `ip|query`, `region|regionName`, `country|countryCode` and `org|organization`.
pub const DEFAULT_IP_LOOKUP_ENDPOINTS: &[&str] = &[
    "https://ipapi.co/json/",
    "https://ipinfo.io/json",
    "https://api.ipify.org?format=json",
];
/// Per-endpoint timeout in milliseconds for public IP lookups.
/// Kept short so an unresponsive provider falls through to the next one quickly.
pub const IP_LOOKUP_TIMEOUT_MS: u64 = 3_000;

// Network quality probe
/// Endpoint used for the throughput measurement.
pub const DEFAULT_SPEED_TEST_URL: &str = "https://speed.cloudflare.com/__down";
/// Number of bytes requested from the speed-test endpoint (~100KB)
pub const SPEED_TEST_BYTES: usize = 100_000;
/// Throughput (in Mbps) above which a network is considered likely trusted
pub const SPEED_THRESHOLD_MBPS: f64 = 10.0;
/// Timeout for the speed-test download in milliseconds
pub const SPEED_TEST_TIMEOUT_MS: u64 = 5_000;

// Geolocation
/// Maximum time to wait for a GPS fix
pub const GPS_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum age of a cached GPS fix that is still acceptable (5 minutes)
pub const GPS_MAX_CACHE_AGE: Duration = Duration::from_secs(5 * 60);
/// Cap on how much reported GPS accuracy may widen an office geofence, in meters.
/// A badly calibrated device must not be able to satisfy geofencing from anywhere.
pub const MAX_ACCURACY_ALLOWANCE_METERS: f64 = 100.0;

// User-facing messages
/// Shown when every signal settled but the combined decision is negative.
pub const ERROR_NOT_IN_OFFICE: &str = "Not connected to the office network or premises. \
     Connect to the office WiFi or be on-site to check in.";
/// Shown when neither the network nor the location could be determined at all.
pub const ERROR_UNABLE_TO_VERIFY: &str = "Unable to verify your office presence. \
     Connect to the office WiFi or enable location services and try again.";

/// Default User-Agent string for outbound lookups.
pub const DEFAULT_USER_AGENT: &str = concat!("office_presence/", env!("CARGO_PKG_VERSION"));

/// Default port for the standalone verification server
pub const DEFAULT_SERVER_PORT: u16 = 8085;

/// Environment variable holding the office registry path
pub const REGISTRY_PATH_ENV: &str = "OFFICE_PRESENCE_REGISTRY";
