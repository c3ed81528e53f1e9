//! JSON status and health handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{ServerState, StatusResponse, VerificationCounts};

/// Last settled result plus decision counters
pub async fn status_handler(State(state): State<ServerState>) -> Response {
    let last_result = state.last_result();
    let response = StatusResponse {
        state: last_result.state(),
        offices: state.registry.offices().len(),
        permissive: state.registry.is_permissive(),
        uptime_seconds: state.start_time.elapsed().as_secs_f64(),
        verifications: VerificationCounts {
            total: state.stats.total_verifications(),
            allowed: state.stats.allowed(),
            denied: state.stats.denied(),
            signal_failures: state.stats.total_failures(),
        },
        last_result,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Liveness probe
pub async fn health_handler() -> &'static str {
    "ok"
}
