//! Office registry data structures.
//!
//! `OfficeDefinition`/`RegistryDefinition` mirror the JSON document;
//! `OfficeLocation`/`OfficeRegistry` are the validated forms the engine uses.

use std::collections::HashSet;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error_handling::RegistryError;
use crate::network::Ipv4Cidr;

/// Geofence of an office: center point and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

/// One office as written in the registry document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDefinition {
    pub name: String,
    #[serde(rename = "allowedIPs", default)]
    pub allowed_ips: Vec<String>,
    #[serde(default)]
    pub allowed_networks: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<OfficeCoordinates>,
}

/// The registry document.
///
/// ```json
/// {
///   "permissive": false,
///   "offices": [
///     {
///       "name": "HQ",
///       "allowedIPs": ["203.0.113.10"],
///       "allowedNetworks": ["10.0.0.0/16"],
///       "coordinates": { "latitude": 12.97, "longitude": 77.59, "radiusMeters": 150 }
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryDefinition {
    /// Allow every IP. Development only; logged loudly on every verification.
    #[serde(default)]
    pub permissive: bool,
    #[serde(default)]
    pub offices: Vec<OfficeDefinition>,
}

/// A validated, registered office.
#[derive(Debug, Clone, PartialEq)]
pub struct OfficeLocation {
    name: String,
    allowed_ips: HashSet<IpAddr>,
    allowed_networks: HashSet<Ipv4Cidr>,
    coordinates: Option<OfficeCoordinates>,
}

impl OfficeLocation {
    /// Builds an office, rejecting malformed IPs, networks and coordinates.
    ///
    /// # Errors
    ///
    /// Returns the first `RegistryError` found. `position` is only used to
    /// identify nameless entries in the message.
    pub fn from_definition(
        position: usize,
        definition: OfficeDefinition,
    ) -> Result<Self, RegistryError> {
        let name = definition.name.trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName(position));
        }

        let mut allowed_ips = HashSet::new();
        for entry in &definition.allowed_ips {
            let ip: IpAddr = entry.trim().parse().map_err(|_| RegistryError::InvalidIp {
                office: name.clone(),
                entry: entry.clone(),
            })?;
            allowed_ips.insert(ip);
        }

        let mut allowed_networks = HashSet::new();
        for entry in &definition.allowed_networks {
            let network: Ipv4Cidr =
                entry
                    .trim()
                    .parse()
                    .map_err(|source| RegistryError::InvalidNetwork {
                        office: name.clone(),
                        entry: entry.clone(),
                        source,
                    })?;
            allowed_networks.insert(network);
        }

        if let Some(coords) = definition.coordinates {
            validate_coordinates(&name, &coords)?;
        }

        Ok(OfficeLocation {
            name,
            allowed_ips,
            allowed_networks,
            coordinates: definition.coordinates,
        })
    }

    /// Convenience constructor for programmatic registries.
    pub fn new<I, N>(
        name: &str,
        allowed_ips: I,
        allowed_networks: N,
        coordinates: Option<OfficeCoordinates>,
    ) -> Result<Self, RegistryError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self::from_definition(
            0,
            OfficeDefinition {
                name: name.to_string(),
                allowed_ips: allowed_ips.into_iter().map(Into::into).collect(),
                allowed_networks: allowed_networks.into_iter().map(Into::into).collect(),
                coordinates,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed_ips(&self) -> &HashSet<IpAddr> {
        &self.allowed_ips
    }

    pub fn allowed_networks(&self) -> &HashSet<Ipv4Cidr> {
        &self.allowed_networks
    }

    pub fn coordinates(&self) -> Option<&OfficeCoordinates> {
        self.coordinates.as_ref()
    }
}

fn validate_coordinates(office: &str, coords: &OfficeCoordinates) -> Result<(), RegistryError> {
    let lat_ok = coords.latitude.is_finite() && (-90.0..=90.0).contains(&coords.latitude);
    let lon_ok = coords.longitude.is_finite() && (-180.0..=180.0).contains(&coords.longitude);
    if !lat_ok || !lon_ok {
        return Err(RegistryError::InvalidCoordinates {
            office: office.to_string(),
            latitude: coords.latitude,
            longitude: coords.longitude,
        });
    }
    if !coords.radius_meters.is_finite() || coords.radius_meters <= 0.0 {
        return Err(RegistryError::InvalidRadius {
            office: office.to_string(),
            radius: coords.radius_meters,
        });
    }
    Ok(())
}

/// How a caller IP matched an office.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// Listed in `allowedIPs`
    ExactIp,
    /// Inside one of `allowedNetworks`
    Network(Ipv4Cidr),
}

/// Result of matching a caller IP against the registry.
#[derive(Debug, Clone, Copy)]
pub struct IpMatch<'a> {
    pub office: &'a OfficeLocation,
    pub reason: MatchReason,
}
