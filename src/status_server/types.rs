//! Server state and wire types.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::{OfficeVerificationEngine, VerificationResult, VerificationState};
use crate::error_handling::{VerificationStats, VerifyError};
use crate::geo::{DevicePosition, FixedPosition, GeolocationProvider, NoGeolocation};
use crate::initialization::init_client;
use crate::probe::{ConnectionHint, NetworkQualityProbe};
use crate::registry::OfficeRegistry;
use crate::resolver::{IpResolver, PublicIpSource, ReportedIp};

/// Shared state for the server
#[derive(Clone)]
pub struct ServerState {
    pub registry: Arc<OfficeRegistry>,
    pub config: Arc<Config>,
    pub client: Arc<reqwest::Client>,
    pub stats: Arc<VerificationStats>,
    pub last_result: Arc<RwLock<VerificationResult>>,
    pub start_time: Arc<Instant>,
}

impl ServerState {
    /// Validates the configuration and registry and builds the shared client.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an empty non-permissive registry, or
    /// when the HTTP client cannot be created.
    pub fn new(registry: Arc<OfficeRegistry>, config: Config) -> Result<Self, VerifyError> {
        config.validate()?;
        if registry.is_empty() && !registry.is_permissive() {
            return Err(VerifyError::EmptyRegistry);
        }
        let client = init_client(&config)?;
        Ok(Self {
            registry,
            config: Arc::new(config),
            client,
            stats: Arc::new(VerificationStats::new()),
            last_result: Arc::new(RwLock::new(VerificationResult::idle())),
            start_time: Arc::new(Instant::now()),
        })
    }

    /// Builds a per-request engine from the signals the device submitted.
    ///
    /// A reported IP replaces the resolver. Missing coordinates mean GPS is
    /// unavailable. The speed test runs from the server, which is assumed to
    /// share the device's network.
    pub fn engine_for(
        &self,
        signals: &DeviceSignals,
    ) -> Result<OfficeVerificationEngine, VerifyError> {
        let ip_source: Arc<dyn PublicIpSource> = match &signals.ip {
            Some(ip) => Arc::new(ReportedIp::new(ip.trim())),
            None => Arc::new(IpResolver::new(
                Arc::clone(&self.client),
                self.config.ip_lookup_urls()?,
                self.config.ip_lookup_timeout(),
            )),
        };

        let geolocation: Arc<dyn GeolocationProvider> = match signals.position() {
            Some(position) => Arc::new(FixedPosition(position)),
            None => Arc::new(NoGeolocation),
        };

        let probe = NetworkQualityProbe::new(
            Arc::clone(&self.client),
            Arc::new(signals.connection_hint()),
            self.config.speed_test_url()?,
            self.config.speed_test_bytes,
            self.config.speed_threshold_mbps,
            self.config.speed_test_timeout(),
        );

        Ok(
            OfficeVerificationEngine::new(Arc::clone(&self.registry), ip_source, geolocation, probe)?
                .with_position_request(self.config.position_request())
                .with_stats(Arc::clone(&self.stats)),
        )
    }

    pub fn last_result(&self) -> VerificationResult {
        self.last_result
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn store_result(&self, result: &VerificationResult) {
        *self
            .last_result
            .write()
            .unwrap_or_else(PoisonError::into_inner) = result.clone();
    }
}

/// Signals collected on the device and submitted with `POST /verify`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSignals {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
    /// Connection type as reported by the platform, e.g. "wifi" or "cellular"
    #[serde(default)]
    pub connection: Option<String>,
}

impl DeviceSignals {
    /// The GPS fix, if both coordinates were submitted.
    ///
    /// A missing accuracy gets no allowance.
    pub fn position(&self) -> Option<DevicePosition> {
        Some(DevicePosition {
            latitude: self.latitude?,
            longitude: self.longitude?,
            accuracy_meters: self.accuracy_meters.unwrap_or(0.0),
        })
    }

    pub fn connection_hint(&self) -> ConnectionHint {
        self.connection
            .as_deref()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }
}

/// JSON response for `/status` endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub state: VerificationState,
    pub offices: usize,
    pub permissive: bool,
    pub uptime_seconds: f64,
    pub verifications: VerificationCounts,
    pub last_result: VerificationResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationCounts {
    pub total: usize,
    pub allowed: usize,
    pub denied: usize,
    pub signal_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_signals_from_camel_case_json() {
        let signals: DeviceSignals = serde_json::from_str(
            r#"{"ip":"10.0.5.7","latitude":1.5,"longitude":2.5,"accuracyMeters":30,"connection":"Cellular"}"#,
        )
        .unwrap();
        assert_eq!(signals.ip.as_deref(), Some("10.0.5.7"));
        let position = signals.position().unwrap();
        assert_eq!(position.accuracy_meters, 30.0);
        assert_eq!(signals.connection_hint(), ConnectionHint::Cellular);
    }

    #[test]
    fn test_partial_coordinates_mean_no_position() {
        let signals = DeviceSignals {
            latitude: Some(1.0),
            ..Default::default()
        };
        assert!(signals.position().is_none());
        assert_eq!(signals.connection_hint(), ConnectionHint::Unknown);
    }

    #[test]
    fn test_empty_registry_is_rejected() {
        let registry = Arc::new(OfficeRegistry::default());
        assert!(matches!(
            ServerState::new(registry, Config::default()),
            Err(VerifyError::EmptyRegistry)
        ));
    }
}
