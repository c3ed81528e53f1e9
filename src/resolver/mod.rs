//! Public IP resolution with provider fallback.
//!
//! `IpResolver` walks an ordered list of lookup services and returns the first
//! answer that contains a parseable IP. Exhausting the list is not an error:
//! it yields `None`, which the engine treats as "signal absent".

mod normalize;
mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error_handling::{categorize_reqwest_error, LookupFailure};

pub use types::LocationInfo;

/// Source of the caller's public network identity.
#[async_trait]
pub trait PublicIpSource: Send + Sync {
    /// Returns the caller's location, or `None` when it cannot be determined.
    async fn lookup(&self) -> Option<LocationInfo>;
}

/// Queries external lookup services in priority order.
#[derive(Debug, Clone)]
pub struct IpResolver {
    client: Arc<reqwest::Client>,
    endpoints: Vec<Url>,
    timeout: Duration,
}

impl IpResolver {
    /// Creates a resolver over `endpoints`, tried in the given order.
    pub fn new(client: Arc<reqwest::Client>, endpoints: Vec<Url>, timeout: Duration) -> Self {
        Self {
            client,
            endpoints,
            timeout,
        }
    }

    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Resolves the public IP, falling through to the next endpoint on any
    /// network error, timeout, non-success status or unparseable body.
    ///
    /// There is no retry within a single call; callers decide whether to try again.
    pub async fn resolve(&self) -> Option<LocationInfo> {
        for endpoint in &self.endpoints {
            match self.query(endpoint).await {
                Ok(info) => {
                    log::debug!("Resolved public IP {} via {}", info.ip, endpoint);
                    return Some(info);
                }
                Err(failure) => {
                    log::warn!("IP lookup via {} failed: {}", endpoint, failure);
                }
            }
        }

        log::warn!(
            "Public IP unavailable: all {} lookup endpoint(s) failed",
            self.endpoints.len()
        );
        None
    }

    async fn query(&self, endpoint: &Url) -> Result<LocationInfo, LookupFailure> {
        let response = self
            .client
            .get(endpoint.clone())
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json, text/plain")
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupFailure::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        normalize::normalize_response(&body).ok_or(LookupFailure::NoIpField)
    }
}

#[async_trait]
impl PublicIpSource for IpResolver {
    async fn lookup(&self) -> Option<LocationInfo> {
        self.resolve().await
    }
}

/// An address already known to the caller, e.g. the peer address seen by a server.
#[derive(Debug, Clone)]
pub struct ReportedIp(pub LocationInfo);

impl ReportedIp {
    pub fn new(ip: impl Into<String>) -> Self {
        Self(LocationInfo::from_ip(ip))
    }
}

#[async_trait]
impl PublicIpSource for ReportedIp {
    async fn lookup(&self) -> Option<LocationInfo> {
        Some(self.0.clone())
    }
}

/// A source that never knows the public IP.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPublicIp;

#[async_trait]
impl PublicIpSource for NoPublicIp {
    async fn lookup(&self) -> Option<LocationInfo> {
        None
    }
}
