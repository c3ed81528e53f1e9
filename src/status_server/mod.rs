//! HTTP server exposing verification as an RPC.
//!
//! Endpoints:
//! - `POST /verify` - run a verification with device-submitted signals
//! - `GET /status` - last settled result and decision counters (JSON)
//! - `GET /metrics` - Prometheus-compatible metrics
//! - `GET /health` - liveness probe

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;

use handlers::{health_handler, metrics_handler, status_handler, verify_handler};
pub use types::{DeviceSignals, ServerState, StatusResponse, VerificationCounts};

/// Builds the router without binding a socket.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/verify", post(verify_handler))
        .route("/status", get(status_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Creates and starts the server, serving until the process exits.
pub async fn start_status_server(port: u16, state: ServerState) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to port {}: {}", port, e))?;

    log::info!("Verification server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Verify: POST http://127.0.0.1:{}/verify", port);
    log::info!("  - Status: http://127.0.0.1:{}/status", port);
    log::info!("  - Metrics: http://127.0.0.1:{}/metrics", port);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
