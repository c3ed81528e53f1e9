//! office_presence library: office check-in verification
//!
//! Decides whether a device is at a registered office by combining three
//! independent signals:
//! - the public IP, matched against each office's allowlist and IPv4 networks
//! - the device's GPS fix, matched against each office's geofence
//! - a network-quality probe (connection hint plus a timed download)
//!
//! A recognized IP is sufficient on its own; otherwise GPS proximity has to be
//! corroborated by a trusted network.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use office_presence::{
//!     Config, ConnectionHint, NoGeolocation, OfficeRegistry, OfficeVerificationEngine,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(OfficeRegistry::from_path(Path::new("offices.json"))?);
//! let engine = OfficeVerificationEngine::from_config(
//!     &Config::default(),
//!     registry,
//!     Arc::new(NoGeolocation),
//!     Arc::new(ConnectionHint::Wifi),
//! )?;
//!
//! let result = engine.verify().await;
//! if !result.is_in_office_network {
//!     println!("{}", result.error.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod engine;
pub mod error_handling;
pub mod geo;
pub mod initialization;
pub mod models;
pub mod network;
pub mod probe;
pub mod registry;
pub mod resolver;
pub mod status_server;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use engine::{OfficeVerificationEngine, SignalReport, VerificationResult, VerificationState};
pub use error_handling::{ConfigError, RegistryError, VerificationStats, VerifyError};
pub use geo::{
    distance_meters, is_within_any_office, DevicePosition, FixedPosition, GeolocationError,
    GeolocationProvider, NoGeolocation, PositionRequest,
};
pub use models::SignalOutcome;
pub use network::{matches, Ipv4Cidr};
pub use probe::{ConnectionHint, NetworkHintProvider, NetworkQualityProbe};
pub use registry::{OfficeLocation, OfficeRegistry};
pub use resolver::{IpResolver, LocationInfo, NoPublicIp, PublicIpSource, ReportedIp};
pub use status_server::{router, start_status_server, DeviceSignals, ServerState};
