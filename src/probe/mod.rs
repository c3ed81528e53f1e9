//! Network-quality probe.
//!
//! A weak corroborating signal: a cellular link is never trusted, a fast link
//! probably is an office network. The probe never fails; when it cannot measure
//! anything it reports the network as trusted, so it can only ever block a
//! check-in by positive evidence.

mod hints;
mod speed;

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::models::SignalOutcome;

pub use hints::{ConnectionHint, NetworkHintProvider};
pub use speed::SpeedSample;

/// What the probe observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub hint: ConnectionHint,
    /// `None` when the hint short-circuited the probe or the download failed
    pub throughput_mbps: Option<f64>,
    pub outcome: SignalOutcome,
}

impl ProbeReport {
    /// Boolean view of the report; a failed probe counts as trusted.
    pub fn is_trusted(&self) -> bool {
        self.outcome.resolve(true)
    }
}

/// Estimates whether the current network is likely a fast, trusted one.
#[derive(Clone)]
pub struct NetworkQualityProbe {
    client: Arc<reqwest::Client>,
    hints: Arc<dyn NetworkHintProvider>,
    speed_test_url: Url,
    speed_test_bytes: usize,
    threshold_mbps: f64,
    timeout: Duration,
}

impl std::fmt::Debug for NetworkQualityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkQualityProbe")
            .field("speed_test_url", &self.speed_test_url.as_str())
            .field("speed_test_bytes", &self.speed_test_bytes)
            .field("threshold_mbps", &self.threshold_mbps)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NetworkQualityProbe {
    pub fn new(
        client: Arc<reqwest::Client>,
        hints: Arc<dyn NetworkHintProvider>,
        speed_test_url: Url,
        speed_test_bytes: usize,
        threshold_mbps: f64,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            hints,
            speed_test_url,
            speed_test_bytes,
            threshold_mbps,
            timeout,
        }
    }

    /// Replaces the hint provider, keeping the speed-test settings.
    pub fn with_hints(mut self, hints: Arc<dyn NetworkHintProvider>) -> Self {
        self.hints = hints;
        self
    }

    pub fn threshold_mbps(&self) -> f64 {
        self.threshold_mbps
    }

    /// Runs the probe and reports the tri-state outcome.
    ///
    /// - cellular hint: `Denied`, no I/O
    /// - measured throughput above the threshold: `Allowed`, otherwise `Denied`
    /// - download failed: `Unavailable`
    pub async fn assess(&self) -> ProbeReport {
        let hint = self.hints.connection_hint();
        if hint.is_cellular() {
            log::info!("Connection hint reports a cellular link; network not trusted");
            return ProbeReport {
                hint,
                throughput_mbps: None,
                outcome: SignalOutcome::Denied,
            };
        }

        match speed::measure(
            &self.client,
            &self.speed_test_url,
            self.speed_test_bytes,
            self.timeout,
        )
        .await
        {
            Ok(sample) => {
                let mbps = sample.mbps();
                let fast = mbps > self.threshold_mbps;
                log::debug!(
                    "Speed test: {} bytes in {:?} = {:.2} Mbps (threshold {:.2}, hint {})",
                    sample.bytes,
                    sample.elapsed,
                    mbps,
                    self.threshold_mbps,
                    hint
                );
                ProbeReport {
                    hint,
                    throughput_mbps: Some(mbps),
                    outcome: SignalOutcome::from_bool(fast),
                }
            }
            Err(failure) => {
                log::warn!(
                    "Speed test against {} failed ({}); treating network as trusted",
                    self.speed_test_url,
                    failure
                );
                ProbeReport {
                    hint,
                    throughput_mbps: None,
                    outcome: SignalOutcome::Unavailable,
                }
            }
        }
    }

    /// Best-effort boolean: false only for cellular or measurably slow links.
    pub async fn is_likely_trusted_network(&self) -> bool {
        self.assess().await.is_trusted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe(url: &str, hint: ConnectionHint, threshold_mbps: f64) -> NetworkQualityProbe {
        NetworkQualityProbe::new(
            Arc::new(reqwest::Client::new()),
            Arc::new(hint),
            Url::parse(url).unwrap(),
            100_000,
            threshold_mbps,
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_cellular_is_never_trusted_and_skips_download() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 100_000]))
            .expect(0)
            .mount(&server)
            .await;

        let probe = probe(&server.uri(), ConnectionHint::Cellular, 10.0);
        let report = probe.assess().await;
        assert_eq!(report.outcome, SignalOutcome::Denied);
        assert_eq!(report.throughput_mbps, None);
        assert!(!probe.is_likely_trusted_network().await);
    }

    #[tokio::test]
    async fn test_fast_download_is_trusted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/__down"))
            .and(query_param("bytes", "100000"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 100_000]))
            .mount(&server)
            .await;

        // A tiny threshold keeps the test independent of machine load
        let probe = probe(
            &format!("{}/__down", server.uri()),
            ConnectionHint::Wifi,
            0.001,
        );
        let report = probe.assess().await;
        assert_eq!(report.outcome, SignalOutcome::Allowed);
        assert!(report.throughput_mbps.unwrap() > 0.001);
    }

    #[tokio::test]
    async fn test_slow_download_is_not_trusted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; 1_000])
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;

        // 8_000 bits in >= 0.4 s is at most 0.02 Mbps
        let probe = probe(&server.uri(), ConnectionHint::Unknown, 10.0);
        let report = probe.assess().await;
        assert_eq!(report.outcome, SignalOutcome::Denied);
        assert!(!report.is_trusted());
    }

    #[tokio::test]
    async fn test_failed_download_defaults_to_trusted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let probe = probe(&server.uri(), ConnectionHint::Wifi, 10.0);
        let report = probe.assess().await;
        assert_eq!(report.outcome, SignalOutcome::Unavailable);
        assert!(probe.is_likely_trusted_network().await);
    }

    #[tokio::test]
    async fn test_empty_body_defaults_to_trusted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let probe = probe(&server.uri(), ConnectionHint::Unknown, 10.0);
        assert_eq!(probe.assess().await.outcome, SignalOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_defaults_to_trusted() {
        let probe = probe("http://127.0.0.1:9/", ConnectionHint::Ethernet, 10.0);
        assert!(probe.is_likely_trusted_network().await);
    }
}
