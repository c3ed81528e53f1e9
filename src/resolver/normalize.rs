//! Normalization of provider responses into `LocationInfo`.
//!
//! Providers disagree on field names (`ip` vs `query`, `region` vs `regionName`,
//! ...). The first non-empty string among the aliases wins.

use std::net::IpAddr;

use serde_json::{Map, Value};

use super::types::LocationInfo;

const IP_KEYS: &[&str] = &["ip", "query"];
const CITY_KEYS: &[&str] = &["city"];
const REGION_KEYS: &[&str] = &["region", "regionName"];
const COUNTRY_KEYS: &[&str] = &["country", "countryCode"];
const ISP_KEYS: &[&str] = &["isp"];
const ORGANIZATION_KEYS: &[&str] = &["org", "organization"];

/// Extracts a `LocationInfo` from a provider response body.
///
/// Accepts a JSON object using any of the known field aliases, or a plain-text
/// body consisting of a bare IP address. Returns `None` when no parseable IP is
/// present.
pub(crate) fn normalize_response(body: &str) -> Option<LocationInfo> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(fields)) => from_json_object(&fields),
        // A bare JSON string such as "203.0.113.7"
        Ok(Value::String(text)) => from_plain_text(&text),
        Ok(_) => None,
        Err(_) => from_plain_text(trimmed),
    }
}

fn from_json_object(fields: &Map<String, Value>) -> Option<LocationInfo> {
    let ip = first_string(fields, IP_KEYS)?;
    let ip = valid_ip(&ip)?;

    Some(LocationInfo {
        ip,
        city: first_string(fields, CITY_KEYS),
        region: first_string(fields, REGION_KEYS),
        country: first_string(fields, COUNTRY_KEYS),
        isp: first_string(fields, ISP_KEYS),
        organization: first_string(fields, ORGANIZATION_KEYS),
    })
}

fn from_plain_text(text: &str) -> Option<LocationInfo> {
    valid_ip(text).map(LocationInfo::from_ip)
}

fn valid_ip(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    candidate
        .parse::<IpAddr>()
        .ok()
        .map(|ip| ip.to_string())
}

fn first_string(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        fields
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}
