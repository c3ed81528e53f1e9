// Shared test helpers for registry fixtures and engine configuration.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;

use office_presence::Config;
use tempfile::NamedTempFile;

/// Latitude of the fixture office.
#[allow(dead_code)] // Used by other test files
pub const HQ_LAT: f64 = 37.7749;
/// Longitude of the fixture office.
#[allow(dead_code)]
pub const HQ_LON: f64 = -122.4194;

/// Registry with one office: an exact IP, the 10.0.0.0/16 network and a
/// 100 m geofence.
#[allow(dead_code)]
pub fn hq_registry_json() -> String {
    format!(
        r#"{{
            "permissive": false,
            "offices": [{{
                "name": "HQ",
                "allowedIPs": ["203.0.113.10"],
                "allowedNetworks": ["10.0.0.0/16"],
                "coordinates": {{ "latitude": {HQ_LAT}, "longitude": {HQ_LON}, "radiusMeters": 100 }}
            }}]
        }}"#
    )
}

/// Writes `content` to a temporary file that lives as long as the handle.
#[allow(dead_code)]
pub fn write_registry_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write registry");
    file.flush().expect("Failed to flush registry");
    file
}

/// Engine configuration pointing every outbound request at a mock server.
#[allow(dead_code)]
pub fn mock_config(ip_endpoints: Vec<String>, speed_test_url: String) -> Config {
    Config {
        ip_lookup_endpoints: ip_endpoints,
        ip_lookup_timeout_ms: 1_000,
        speed_test_url,
        speed_test_timeout_ms: 1_000,
        gps_timeout_ms: 1_000,
        ..Default::default()
    }
}

/// A point `meters` due north of the fixture office.
#[allow(dead_code)]
pub fn north_of_hq(meters: f64) -> (f64, f64) {
    // One degree of latitude is ~111 195 m on a 6 371 km sphere
    (HQ_LAT + meters / 111_195.0, HQ_LON)
}
