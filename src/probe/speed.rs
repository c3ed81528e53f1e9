//! Timed download used to estimate throughput.

use std::time::{Duration, Instant};

use url::Url;

use crate::error_handling::{categorize_reqwest_error, LookupFailure};

/// One completed throughput measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    pub bytes: usize,
    pub elapsed: Duration,
}

impl SpeedSample {
    /// Throughput in megabits per second.
    pub fn mbps(&self) -> f64 {
        // Guard against a zero-length clock reading on very fast local links
        let secs = self.elapsed.as_secs_f64().max(1e-6);
        (self.bytes as f64 * 8.0) / secs / 1_000_000.0
    }
}

/// Appends the requested size and a random cache-buster to the endpoint.
pub(crate) fn speed_test_url(base: &Url, bytes: usize) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("bytes", &bytes.to_string())
        .append_pair("r", &rand::random::<u64>().to_string());
    url
}

/// Downloads roughly `bytes` bytes from `base` and times the transfer.
pub(crate) async fn measure(
    client: &reqwest::Client,
    base: &Url,
    bytes: usize,
    timeout: Duration,
) -> Result<SpeedSample, LookupFailure> {
    let url = speed_test_url(base, bytes);
    let started = Instant::now();

    let response = client
        .get(url)
        .timeout(timeout)
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupFailure::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?;
    let elapsed = started.elapsed();

    if body.is_empty() {
        return Err(LookupFailure::Body);
    }

    Ok(SpeedSample {
        bytes: body.len(),
        elapsed,
    })
}
