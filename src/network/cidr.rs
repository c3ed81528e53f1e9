//! IPv4 CIDR parsing and membership tests.
//!
//! Inputs come from provider responses and configuration files, so parsing never
//! panics: malformed strings yield `false` (or a `CidrParseError` via `FromStr`).

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use thiserror::Error;

/// Reasons a CIDR string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrParseError {
    /// No `/n` suffix. A bare address is not treated as `/32`.
    #[error("missing '/prefix' length")]
    MissingPrefix,

    /// The network part is not four dot-separated octets in 0-255.
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),

    /// The prefix is not an integer in 0-32.
    #[error("invalid prefix length '{0}' (expected 0-32)")]
    InvalidPrefix(String),
}

/// An IPv4 network in CIDR notation, e.g. `10.0.0.0/16`.
///
/// Host bits of the network address are kept as written; membership masks both
/// sides, so `10.0.5.1/16` and `10.0.0.0/16` describe the same range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    network: Ipv4Addr,
    prefix: u8,
}

impl Ipv4Cidr {
    /// Network address as written.
    pub fn network(&self) -> Ipv4Addr {
        self.network
    }

    /// Prefix length (0-32).
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The 32-bit mask for this prefix. `/0` yields an all-zero mask.
    pub fn mask(&self) -> u32 {
        prefix_mask(self.prefix)
    }

    /// Membership test: `(ip & mask) == (network & mask)`.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let mask = self.mask();
        (u32::from(ip) & mask) == (u32::from(self.network) & mask)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, prefix) = s.split_once('/').ok_or(CidrParseError::MissingPrefix)?;

        let network =
            parse_ipv4(address).ok_or_else(|| CidrParseError::InvalidAddress(address.to_string()))?;

        // u8::from_str accepts a leading '+', so check the digits explicitly
        if prefix.is_empty() || prefix.len() > 2 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CidrParseError::InvalidPrefix(prefix.to_string()));
        }
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| CidrParseError::InvalidPrefix(prefix.to_string()))?;
        if prefix > 32 {
            return Err(CidrParseError::InvalidPrefix(prefix.to_string()));
        }

        Ok(Ipv4Cidr { network, prefix })
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// Parses a dotted-quad IPv4 address.
///
/// Uses the standard library parser, which also rejects octets with leading
/// zeros (`010.0.0.1`) since they are ambiguous with octal notation.
pub fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    s.parse().ok()
}

/// Returns true when `ip` is inside `cidr`.
///
/// Any malformed input (bad address, missing or out-of-range prefix) returns
/// `false`.
pub fn matches(ip: &str, cidr: &str) -> bool {
    let Some(ip) = parse_ipv4(ip) else {
        return false;
    };
    match cidr.parse::<Ipv4Cidr>() {
        Ok(network) => network.contains(ip),
        Err(_) => false,
    }
}

/// Returns true when `cidr` is a well-formed `a.b.c.d/n` block.
pub fn is_valid_cidr(cidr: &str) -> bool {
    cidr.parse::<Ipv4Cidr>().is_ok()
}

fn prefix_mask(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_inside_network() {
        assert!(matches("192.168.1.5", "192.168.1.0/24"));
    }

    #[test]
    fn test_matches_outside_network() {
        assert!(!matches("192.168.2.5", "192.168.1.0/24"));
    }

    #[test]
    fn test_matches_slash_32_is_exact() {
        for ip in ["0.0.0.0", "10.0.5.7", "192.168.1.1", "255.255.255.255"] {
            assert!(matches(ip, &format!("{ip}/32")), "{ip}/32 should match {ip}");
        }
        assert!(!matches("10.0.5.8", "10.0.5.7/32"));
    }

    #[test]
    fn test_matches_slash_0_matches_everything() {
        for ip in ["0.0.0.0", "8.8.8.8", "172.16.4.2", "255.255.255.255"] {
            assert!(matches(ip, "0.0.0.0/0"), "{ip} should match /0");
        }
    }

    #[test]
    fn test_matches_ignores_host_bits_in_network() {
        assert!(matches("10.0.200.1", "10.0.5.1/16"));
        assert!(!matches("10.1.0.1", "10.0.5.1/16"));
    }

    #[test]
    fn test_matches_odd_prefix() {
        // 172.16.0.0/12 spans 172.16.0.0 - 172.31.255.255
        assert!(matches("172.31.255.255", "172.16.0.0/12"));
        assert!(!matches("172.32.0.0", "172.16.0.0/12"));
    }

    #[test]
    fn test_missing_prefix_is_invalid() {
        assert!(!is_valid_cidr("10.0.0.1"));
        assert!(!matches("10.0.0.1", "10.0.0.1"));
        assert_eq!(
            "10.0.0.1".parse::<Ipv4Cidr>(),
            Err(CidrParseError::MissingPrefix)
        );
    }

    #[test]
    fn test_invalid_prefixes() {
        for cidr in [
            "10.0.0.0/33",
            "10.0.0.0/",
            "10.0.0.0/-1",
            "10.0.0.0/+8",
            "10.0.0.0/abc",
            "10.0.0.0/8/8",
            "10.0.0.0/008",
        ] {
            assert!(!is_valid_cidr(cidr), "{cidr} should be invalid");
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for cidr in [
            "256.0.0.0/8",
            "10.0.0/8",
            "10.0.0.0.0/8",
            "a.b.c.d/8",
            "/8",
            " 10.0.0.0/8",
            "::1/128",
        ] {
            assert!(!is_valid_cidr(cidr), "{cidr} should be invalid");
        }
    }

    #[test]
    fn test_malformed_ip_never_matches() {
        for ip in ["", "not-an-ip", "10.0.0", "10.0.0.256", "10.0.0.1 ", "::1"] {
            assert!(!matches(ip, "0.0.0.0/0"), "{ip:?} should not match");
        }
    }

    #[test]
    fn test_mask_values() {
        let cidr: Ipv4Cidr = "0.0.0.0/0".parse().unwrap();
        assert_eq!(cidr.mask(), 0);
        let cidr: Ipv4Cidr = "0.0.0.0/32".parse().unwrap();
        assert_eq!(cidr.mask(), u32::MAX);
        let cidr: Ipv4Cidr = "0.0.0.0/24".parse().unwrap();
        assert_eq!(cidr.mask(), 0xFFFF_FF00);
    }

    #[test]
    fn test_display() {
        let cidr: Ipv4Cidr = "10.0.0.0/16".parse().unwrap();
        assert_eq!(cidr.to_string(), "10.0.0.0/16");
        assert_eq!(cidr.prefix(), 16);
        assert_eq!(cidr.network(), Ipv4Addr::new(10, 0, 0, 0));
    }

    #[test]
    fn test_error_messages() {
        let err = "10.0.0.0/40".parse::<Ipv4Cidr>().unwrap_err();
        assert!(err.to_string().contains("0-32"));
        let err = "300.1.1.1/8".parse::<Ipv4Cidr>().unwrap_err();
        assert!(err.to_string().contains("300.1.1.1"));
    }
}
