//! Registered office locations.
//!
//! The registry is injected into the engine rather than owned by it. Every entry
//! is validated when the registry is built, so matching never has to deal with
//! malformed configuration.

mod types;

use std::collections::HashSet;
use std::net::IpAddr;
use std::path::Path;

use crate::error_handling::RegistryError;

pub use types::{
    IpMatch, MatchReason, OfficeCoordinates, OfficeDefinition, OfficeLocation, RegistryDefinition,
};

/// Validated set of offices plus the explicit `permissive` switch.
#[derive(Debug, Clone, Default)]
pub struct OfficeRegistry {
    offices: Vec<OfficeLocation>,
    permissive: bool,
}

impl OfficeRegistry {
    /// Builds a strict registry, rejecting duplicate office names.
    pub fn new(offices: Vec<OfficeLocation>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for office in &offices {
            if !seen.insert(office.name().to_string()) {
                return Err(RegistryError::DuplicateName(office.name().to_string()));
            }
        }
        Ok(Self {
            offices,
            permissive: false,
        })
    }

    /// Enables or disables permissive mode (every IP is accepted).
    pub fn with_permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    /// Validates a parsed registry document.
    pub fn from_definition(definition: RegistryDefinition) -> Result<Self, RegistryError> {
        let offices = definition
            .offices
            .into_iter()
            .enumerate()
            .map(|(position, office)| OfficeLocation::from_definition(position, office))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(offices)?.with_permissive(definition.permissive))
    }

    /// Parses and validates a JSON registry document.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let definition: RegistryDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    /// Loads a JSON registry document from disk.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json_str(&content)?;
        log::info!(
            "Loaded {} office(s) from {}{}",
            registry.offices.len(),
            path.display(),
            if registry.permissive {
                " (permissive mode)"
            } else {
                ""
            }
        );
        Ok(registry)
    }

    pub fn offices(&self) -> &[OfficeLocation] {
        &self.offices
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    pub fn is_empty(&self) -> bool {
        self.offices.is_empty()
    }

    /// Looks up an office by name.
    pub fn get(&self, name: &str) -> Option<&OfficeLocation> {
        self.offices.iter().find(|office| office.name() == name)
    }

    /// Finds the first office whose allowlist or networks contain `ip`.
    ///
    /// Exact allowlist entries are checked before networks for each office.
    /// Unparsable input and IPv6 addresses outside every allowlist return `None`.
    pub fn match_ip(&self, ip: &str) -> Option<IpMatch<'_>> {
        let ip: IpAddr = ip.trim().parse().ok()?;
        self.offices.iter().find_map(|office| {
            if office.allowed_ips().contains(&ip) {
                return Some(IpMatch {
                    office,
                    reason: MatchReason::ExactIp,
                });
            }
            let IpAddr::V4(v4) = ip else {
                return None;
            };
            office
                .allowed_networks()
                .iter()
                .find(|network| network.contains(v4))
                .map(|network| IpMatch {
                    office,
                    reason: MatchReason::Network(*network),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "offices": [
            {
                "name": "HQ",
                "allowedIPs": ["203.0.113.10"],
                "allowedNetworks": ["10.0.0.0/16"],
                "coordinates": { "latitude": 12.9716, "longitude": 77.5946, "radiusMeters": 150 }
            },
            {
                "name": "Branch",
                "allowedNetworks": ["192.168.1.0/24"]
            }
        ]
    }"#;

    #[test]
    fn test_from_json_str_loads_offices() {
        let registry = OfficeRegistry::from_json_str(SAMPLE).unwrap();
        assert_eq!(registry.offices().len(), 2);
        assert!(!registry.is_permissive());
        let hq = registry.get("HQ").unwrap();
        assert_eq!(hq.allowed_ips().len(), 1);
        assert_eq!(hq.coordinates().unwrap().radius_meters, 150.0);
        assert!(registry.get("Branch").unwrap().coordinates().is_none());
    }

    #[test]
    fn test_match_ip_exact() {
        let registry = OfficeRegistry::from_json_str(SAMPLE).unwrap();
        let m = registry.match_ip("203.0.113.10").unwrap();
        assert_eq!(m.office.name(), "HQ");
        assert_eq!(m.reason, MatchReason::ExactIp);
    }

    #[test]
    fn test_match_ip_network() {
        let registry = OfficeRegistry::from_json_str(SAMPLE).unwrap();
        let m = registry.match_ip("192.168.1.77").unwrap();
        assert_eq!(m.office.name(), "Branch");
        assert!(matches!(m.reason, MatchReason::Network(n) if n.to_string() == "192.168.1.0/24"));
    }

    #[test]
    fn test_match_ip_no_match() {
        let registry = OfficeRegistry::from_json_str(SAMPLE).unwrap();
        assert!(registry.match_ip("8.8.8.8").is_none());
        assert!(registry.match_ip("not an ip").is_none());
        assert!(registry.match_ip("2001:db8::1").is_none());
    }

    #[test]
    fn test_match_ip_exact_ipv6() {
        let office = OfficeLocation::new("V6", ["2001:db8::10"], Vec::<String>::new(), None).unwrap();
        let registry = OfficeRegistry::new(vec![office]).unwrap();
        assert!(registry.match_ip("2001:db8::10").is_some());
    }

    #[test]
    fn test_invalid_network_rejected_at_load() {
        let json = r#"{ "offices": [ { "name": "HQ", "allowedNetworks": ["10.0.0.0/33"] } ] }"#;
        let err = OfficeRegistry::from_json_str(json).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidNetwork { ref entry, .. } if entry == "10.0.0.0/33"));
        assert!(err.to_string().contains("HQ"));
    }

    #[test]
    fn test_bare_address_network_rejected() {
        let json = r#"{ "offices": [ { "name": "HQ", "allowedNetworks": ["10.0.0.1"] } ] }"#;
        assert!(matches!(
            OfficeRegistry::from_json_str(json),
            Err(RegistryError::InvalidNetwork { .. })
        ));
    }

    #[test]
    fn test_wildcard_ip_rejected() {
        // The permissive flag replaces any '*' sentinel
        let json = r#"{ "offices": [ { "name": "Dev", "allowedIPs": ["*"] } ] }"#;
        assert!(matches!(
            OfficeRegistry::from_json_str(json),
            Err(RegistryError::InvalidIp { .. })
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let json = r#"{ "offices": [ { "name": "  " } ] }"#;
        assert!(matches!(
            OfficeRegistry::from_json_str(json),
            Err(RegistryError::EmptyName(0))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let json = r#"{ "offices": [ { "name": "HQ" }, { "name": "HQ" } ] }"#;
        assert!(matches!(
            OfficeRegistry::from_json_str(json),
            Err(RegistryError::DuplicateName(ref name)) if name == "HQ"
        ));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let json = r#"{ "offices": [ { "name": "HQ",
            "coordinates": { "latitude": 0, "longitude": 0, "radiusMeters": 0 } } ] }"#;
        assert!(matches!(
            OfficeRegistry::from_json_str(json),
            Err(RegistryError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let json = r#"{ "offices": [ { "name": "HQ",
            "coordinates": { "latitude": 91, "longitude": 0, "radiusMeters": 10 } } ] }"#;
        assert!(matches!(
            OfficeRegistry::from_json_str(json),
            Err(RegistryError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(
            OfficeRegistry::from_json_str("{ not json"),
            Err(RegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_permissive_flag() {
        let registry = OfficeRegistry::from_json_str(r#"{ "permissive": true }"#).unwrap();
        assert!(registry.is_permissive());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let registry = OfficeRegistry::from_path(file.path()).unwrap();
        assert_eq!(registry.offices().len(), 2);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OfficeRegistry::from_path(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
