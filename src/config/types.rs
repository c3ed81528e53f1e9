//! Configuration types.
//!
//! This module defines the library configuration and the logging enums shared
//! with the command-line interface.

use std::time::Duration;

use clap::ValueEnum;
use url::Url;

use crate::config::constants::{
    DEFAULT_IP_LOOKUP_ENDPOINTS, DEFAULT_SPEED_TEST_URL, DEFAULT_USER_AGENT, GPS_MAX_CACHE_AGE,
    GPS_TIMEOUT, IP_LOOKUP_TIMEOUT_MS, SPEED_TEST_BYTES, SPEED_TEST_TIMEOUT_MS,
    SPEED_THRESHOLD_MBPS,
};
use crate::error_handling::ConfigError;
use crate::geo::PositionRequest;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Holds the tunables of the three verification signals. The office registry
/// is deliberately not part of it: it is loaded separately and injected into
/// the engine.
///
/// # Examples
///
/// ```no_run
/// use office_presence::Config;
///
/// let config = Config {
///     speed_threshold_mbps: 25.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Public IP lookup endpoints, tried in order
    pub ip_lookup_endpoints: Vec<String>,

    /// Per-endpoint lookup timeout in milliseconds
    pub ip_lookup_timeout_ms: u64,

    /// Speed-test download endpoint
    pub speed_test_url: String,

    /// Number of bytes to download for the speed test
    pub speed_test_bytes: usize,

    /// Throughput threshold in Mbps for a "likely trusted" network
    pub speed_threshold_mbps: f64,

    /// Speed-test request timeout in milliseconds
    pub speed_test_timeout_ms: u64,

    /// Maximum time to wait for a GPS fix, in milliseconds
    pub gps_timeout_ms: u64,

    /// Maximum age of an acceptable cached GPS fix, in milliseconds
    pub gps_max_cache_age_ms: u64,

    /// Request a high-accuracy GPS fix
    pub gps_high_accuracy: bool,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            ip_lookup_endpoints: DEFAULT_IP_LOOKUP_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ip_lookup_timeout_ms: IP_LOOKUP_TIMEOUT_MS,
            speed_test_url: DEFAULT_SPEED_TEST_URL.to_string(),
            speed_test_bytes: SPEED_TEST_BYTES,
            speed_threshold_mbps: SPEED_THRESHOLD_MBPS,
            speed_test_timeout_ms: SPEED_TEST_TIMEOUT_MS,
            gps_timeout_ms: GPS_TIMEOUT.as_millis() as u64,
            gps_max_cache_age_ms: GPS_MAX_CACHE_AGE.as_millis() as u64,
            gps_high_accuracy: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Validates the configuration, rejecting values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ip_lookup_urls()?;
        self.speed_test_url()?;
        if !self.speed_threshold_mbps.is_finite() || self.speed_threshold_mbps <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.speed_threshold_mbps));
        }
        if self.speed_test_bytes == 0 {
            return Err(ConfigError::ZeroValue("speed_test_bytes"));
        }
        if self.ip_lookup_timeout_ms == 0 {
            return Err(ConfigError::ZeroValue("ip_lookup_timeout_ms"));
        }
        if self.speed_test_timeout_ms == 0 {
            return Err(ConfigError::ZeroValue("speed_test_timeout_ms"));
        }
        if self.gps_timeout_ms == 0 {
            return Err(ConfigError::ZeroValue("gps_timeout_ms"));
        }
        Ok(())
    }

    /// Parses the configured lookup endpoints, preserving their order.
    pub fn ip_lookup_urls(&self) -> Result<Vec<Url>, ConfigError> {
        self.ip_lookup_endpoints
            .iter()
            .map(|endpoint| parse_http_url(endpoint))
            .collect()
    }

    /// Parses the speed-test endpoint.
    pub fn speed_test_url(&self) -> Result<Url, ConfigError> {
        parse_http_url(&self.speed_test_url)
    }

    /// Per-endpoint IP lookup timeout.
    pub fn ip_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.ip_lookup_timeout_ms)
    }

    /// Speed-test request timeout.
    pub fn speed_test_timeout(&self) -> Duration {
        Duration::from_millis(self.speed_test_timeout_ms)
    }

    /// The geolocation request derived from the GPS settings.
    pub fn position_request(&self) -> PositionRequest {
        PositionRequest {
            high_accuracy: self.gps_high_accuracy,
            timeout: Duration::from_millis(self.gps_timeout_ms),
            max_cache_age: Duration::from_millis(self.gps_max_cache_age_ms),
        }
    }
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ip_lookup_endpoints.len(), 3);
        assert_eq!(config.speed_test_bytes, 100_000);
        assert_eq!(config.speed_threshold_mbps, 10.0);
        assert_eq!(config.gps_timeout_ms, 10_000);
        assert_eq!(config.gps_max_cache_age_ms, 300_000);
        assert!(config.gps_high_accuracy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let config = Config {
            ip_lookup_endpoints: vec!["not a url".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = Config {
            speed_test_url: "ftp://example.com/file".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_validate_rejects_non_positive_threshold() {
        for threshold in [0.0, -1.0, f64::NAN] {
            let config = Config {
                speed_threshold_mbps: threshold,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))),
                "threshold {threshold} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let config = Config {
            speed_test_bytes: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroValue("speed_test_bytes"))
        ));
    }

    #[test]
    fn test_ip_lookup_urls_preserve_order() {
        let config = Config {
            ip_lookup_endpoints: vec![
                "http://first.example/".to_string(),
                "http://second.example/".to_string(),
            ],
            ..Default::default()
        };
        let urls = config.ip_lookup_urls().unwrap();
        assert_eq!(urls[0].host_str(), Some("first.example"));
        assert_eq!(urls[1].host_str(), Some("second.example"));
    }

    #[test]
    fn test_position_request_from_config() {
        let config = Config {
            gps_timeout_ms: 2_500,
            gps_max_cache_age_ms: 0,
            gps_high_accuracy: false,
            ..Default::default()
        };
        let request = config.position_request();
        assert_eq!(request.timeout, Duration::from_millis(2_500));
        assert_eq!(request.max_cache_age, Duration::ZERO);
        assert!(!request.high_accuracy);
    }
}
