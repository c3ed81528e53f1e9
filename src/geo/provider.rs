//! Device geolocation interface.
//!
//! The engine never talks to GPS hardware or a browser API directly; it asks a
//! `GeolocationProvider` for a fix and treats every error as "signal absent".

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters passed to the device when requesting a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    /// Ask for a GPS-quality fix rather than a coarse network estimate
    pub high_accuracy: bool,
    /// How long the device may take to produce a fix
    pub timeout: Duration,
    /// Oldest cached fix the device may return instead of acquiring a new one
    pub max_cache_age: Duration,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: crate::config::GPS_TIMEOUT,
            max_cache_age: crate::config::GPS_MAX_CACHE_AGE,
        }
    }
}

/// A position reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePosition {
    pub latitude: f64,
    pub longitude: f64,
    /// 95% confidence radius in meters, as reported by the device
    pub accuracy_meters: f64,
}

/// Why no position is available.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    /// The user or platform refused location access.
    #[error("location permission denied")]
    PermissionDenied,

    /// The device has no geolocation capability.
    #[error("geolocation is not supported on this device")]
    Unsupported,

    /// No fix within the requested timeout.
    #[error("timed out waiting for a location fix")]
    Timeout,

    /// Any other device-side failure.
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of device positions.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(
        &self,
        request: &PositionRequest,
    ) -> Result<DevicePosition, GeolocationError>;
}

/// A provider that always reports the same position.
///
/// Used when the position was captured elsewhere, e.g. by a client that
/// submits its GPS reading alongside the verification request.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub DevicePosition);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(
        &self,
        _request: &PositionRequest,
    ) -> Result<DevicePosition, GeolocationError> {
        Ok(self.0)
    }
}

/// A provider for devices without geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl GeolocationProvider for NoGeolocation {
    async fn current_position(
        &self,
        _request: &PositionRequest,
    ) -> Result<DevicePosition, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}
