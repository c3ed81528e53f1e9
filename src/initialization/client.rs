//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client shared by the IP resolver and the speed test.
///
/// Per-request timeouts are set by the callers, since IP lookups and the
/// speed test use different budgets. The client-level timeout is the larger
/// of the two as a backstop.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let backstop = config.ip_lookup_timeout().max(config.speed_test_timeout());
    let client = ClientBuilder::new()
        .timeout(backstop)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
