//! Office verification engine.
//!
//! Runs the three signal checks concurrently, folds them through the
//! combination policy and publishes a [`VerificationResult`]. While a check is
//! in flight, [`OfficeVerificationEngine::snapshot`] reports `Checking`; the
//! in-flight marker is owned by a drop guard, so a cancelled `verify()` never
//! leaves the engine stuck in `Checking`.

pub mod policy;
mod types;

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use log::{debug, info, warn};

use crate::config::Config;
use crate::error_handling::{FailureType, VerificationStats, VerifyError};
use crate::geo::{
    find_containing_office, nearest_office_distance, GeolocationError, GeolocationProvider,
    PositionRequest,
};
use crate::initialization::init_client;
use crate::models::SignalOutcome;
use crate::probe::{NetworkHintProvider, NetworkQualityProbe};
use crate::registry::OfficeRegistry;
use crate::resolver::{IpResolver, LocationInfo, PublicIpSource};

pub use policy::combine;
pub use types::{SignalReport, VerificationResult, VerificationState};

struct IpCheck {
    location: Option<LocationInfo>,
    outcome: SignalOutcome,
    office: Option<String>,
}

struct GpsCheck {
    outcome: SignalOutcome,
    failure: Option<FailureType>,
    office: Option<String>,
    nearest_distance: Option<f64>,
}

#[derive(Debug, Default)]
struct Published {
    settled: VerificationResult,
    in_flight: usize,
}

/// Marks a verification as in flight for as long as it lives.
struct CheckingGuard<'a> {
    slot: &'a RwLock<Published>,
}

impl<'a> CheckingGuard<'a> {
    fn begin(slot: &'a RwLock<Published>) -> Self {
        slot.write().unwrap_or_else(PoisonError::into_inner).in_flight += 1;
        Self { slot }
    }

    fn settle(self, result: VerificationResult) {
        self.slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .settled = result;
    }
}

impl Drop for CheckingGuard<'_> {
    fn drop(&mut self) {
        let mut published = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        published.in_flight = published.in_flight.saturating_sub(1);
    }
}

/// Decides whether the device is at a registered office.
pub struct OfficeVerificationEngine {
    registry: Arc<OfficeRegistry>,
    ip_source: Arc<dyn PublicIpSource>,
    geolocation: Arc<dyn GeolocationProvider>,
    probe: NetworkQualityProbe,
    position_request: PositionRequest,
    stats: Arc<VerificationStats>,
    published: RwLock<Published>,
}

impl std::fmt::Debug for OfficeVerificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfficeVerificationEngine")
            .field("offices", &self.registry.offices().len())
            .field("permissive", &self.registry.is_permissive())
            .field("probe", &self.probe)
            .field("position_request", &self.position_request)
            .finish()
    }
}

impl OfficeVerificationEngine {
    /// Creates an engine over the given signal sources.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::EmptyRegistry` if the registry has no offices and
    /// is not permissive.
    pub fn new(
        registry: Arc<OfficeRegistry>,
        ip_source: Arc<dyn PublicIpSource>,
        geolocation: Arc<dyn GeolocationProvider>,
        probe: NetworkQualityProbe,
    ) -> Result<Self, VerifyError> {
        if registry.is_empty() && !registry.is_permissive() {
            return Err(VerifyError::EmptyRegistry);
        }
        Ok(Self {
            registry,
            ip_source,
            geolocation,
            probe,
            position_request: PositionRequest::default(),
            stats: Arc::new(VerificationStats::new()),
            published: RwLock::new(Published::default()),
        })
    }

    /// Builds an engine with the HTTP-backed IP resolver and speed test
    /// described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP client
    /// cannot be built, or the registry is empty.
    pub fn from_config(
        config: &Config,
        registry: Arc<OfficeRegistry>,
        geolocation: Arc<dyn GeolocationProvider>,
        hints: Arc<dyn NetworkHintProvider>,
    ) -> Result<Self, VerifyError> {
        config.validate()?;
        let client = init_client(config)?;
        let resolver = IpResolver::new(
            Arc::clone(&client),
            config.ip_lookup_urls()?,
            config.ip_lookup_timeout(),
        );
        let probe = NetworkQualityProbe::new(
            client,
            hints,
            config.speed_test_url()?,
            config.speed_test_bytes,
            config.speed_threshold_mbps,
            config.speed_test_timeout(),
        );
        Ok(Self::new(registry, Arc::new(resolver), geolocation, probe)?
            .with_position_request(config.position_request()))
    }

    pub fn with_position_request(mut self, request: PositionRequest) -> Self {
        self.position_request = request;
        self
    }

    /// Replaces the public IP source, e.g. with an address the caller already knows.
    pub fn with_ip_source(mut self, ip_source: Arc<dyn PublicIpSource>) -> Self {
        self.ip_source = ip_source;
        self
    }

    /// Shares a stats collector, e.g. across per-request engines.
    pub fn with_stats(mut self, stats: Arc<VerificationStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn registry(&self) -> &OfficeRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &Arc<VerificationStats> {
        &self.stats
    }

    /// The currently published result: `checking()` while a verification is
    /// in flight, otherwise the last settled result.
    pub fn snapshot(&self) -> VerificationResult {
        let published = self.published.read().unwrap_or_else(PoisonError::into_inner);
        if published.in_flight > 0 {
            VerificationResult::checking()
        } else {
            published.settled.clone()
        }
    }

    pub fn state(&self) -> VerificationState {
        self.snapshot().state()
    }

    pub fn is_checking(&self) -> bool {
        self.state() == VerificationState::Checking
    }

    /// Runs one verification.
    ///
    /// Never fails: every signal failure is folded into the result according
    /// to the per-signal failure policy.
    pub async fn verify(&self) -> VerificationResult {
        let guard = CheckingGuard::begin(&self.published);
        debug!(
            "Starting office verification against {} office(s)",
            self.registry.offices().len()
        );

        let (ip, gps, network) =
            tokio::join!(self.check_ip(), self.check_gps(), self.probe.assess());

        if ip.outcome == SignalOutcome::Unavailable {
            self.stats
                .increment_failure(FailureType::IpLookupUnavailable);
        }
        if let Some(failure) = gps.failure {
            self.stats.increment_failure(failure);
        }
        if network.outcome == SignalOutcome::Unavailable {
            self.stats.increment_failure(FailureType::SpeedTestFailed);
        }

        let signals = SignalReport {
            ip: ip.outcome,
            gps: gps.outcome,
            network: network.outcome,
            matched_office: ip.office.or(gps.office),
            distance_meters: gps.nearest_distance,
            throughput_mbps: network.throughput_mbps,
        };
        let (allowed, error) = policy::decide(&signals);
        self.stats.record_decision(allowed);

        info!(
            "Office verification {}: ip={} gps={} network={}{}",
            if allowed { "allowed" } else { "denied" },
            signals.ip,
            signals.gps,
            signals.network,
            signals
                .matched_office
                .as_deref()
                .map(|office| format!(" office={}", office))
                .unwrap_or_default()
        );

        let result = VerificationResult {
            is_in_office_network: allowed,
            current_location: ip.location,
            is_checking: false,
            error,
            signals: Some(signals),
            checked_at: Some(Utc::now()),
        };
        guard.settle(result.clone());
        result
    }

    async fn check_ip(&self) -> IpCheck {
        let location = self.ip_source.lookup().await;

        if self.registry.is_permissive() {
            warn!("Office registry is permissive; IP check allows every address");
            return IpCheck {
                location,
                outcome: SignalOutcome::Allowed,
                office: None,
            };
        }

        let Some(info) = location else {
            warn!("Public IP could not be determined");
            return IpCheck {
                location: None,
                outcome: SignalOutcome::Unavailable,
                office: None,
            };
        };

        match self.registry.match_ip(&info.ip) {
            Some(found) => {
                debug!(
                    "IP {} matches office '{}' ({:?})",
                    info.ip,
                    found.office.name(),
                    found.reason
                );
                let office = Some(found.office.name().to_string());
                IpCheck {
                    location: Some(info),
                    outcome: SignalOutcome::Allowed,
                    office,
                }
            }
            None => {
                debug!("IP {} matches no registered office", info.ip);
                IpCheck {
                    location: Some(info),
                    outcome: SignalOutcome::Denied,
                    office: None,
                }
            }
        }
    }

    async fn check_gps(&self) -> GpsCheck {
        let request = self.position_request;
        let fix = tokio::time::timeout(
            request.timeout,
            self.geolocation.current_position(&request),
        )
        .await
        .unwrap_or(Err(GeolocationError::Timeout));

        let position = match fix {
            Ok(position)
                if position.latitude.is_finite() && position.longitude.is_finite() =>
            {
                position
            }
            Ok(position) => {
                warn!("Discarding non-finite position fix {:?}", position);
                return GpsCheck::unavailable(FailureType::GeolocationUnavailable);
            }
            Err(e) => {
                warn!("Geolocation unavailable: {}", e);
                let failure = match e {
                    GeolocationError::PermissionDenied => FailureType::GeolocationDenied,
                    GeolocationError::Unsupported => FailureType::GeolocationUnsupported,
                    GeolocationError::Timeout => FailureType::GeolocationTimeout,
                    GeolocationError::Unavailable(_) => FailureType::GeolocationUnavailable,
                };
                return GpsCheck::unavailable(failure);
            }
        };

        let offices = self.registry.offices();
        let nearest_distance = nearest_office_distance(position.latitude, position.longitude, offices)
            .map(|(_, distance)| distance);

        match find_containing_office(
            position.latitude,
            position.longitude,
            position.accuracy_meters,
            offices,
        ) {
            Some(found) => {
                debug!(
                    "Position within {:.0} m of office '{}' (effective radius {:.0} m)",
                    found.distance_meters, found.office, found.effective_radius_meters
                );
                GpsCheck {
                    outcome: SignalOutcome::Allowed,
                    failure: None,
                    office: Some(found.office),
                    nearest_distance,
                }
            }
            None => GpsCheck {
                outcome: SignalOutcome::Denied,
                failure: None,
                office: None,
                nearest_distance,
            },
        }
    }
}

impl GpsCheck {
    fn unavailable(failure: FailureType) -> Self {
        Self {
            outcome: SignalOutcome::Unavailable,
            failure: Some(failure),
            office: None,
            nearest_distance: None,
        }
    }
}
