//! IP address parsing and network membership.

pub mod cidr;

pub use cidr::{is_valid_cidr, matches, CidrParseError, Ipv4Cidr};
