//! Prometheus metrics handler.

use std::fmt::Write;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum::IntoEnumIterator;

use super::super::types::ServerState;
use crate::error_handling::FailureType;

/// Prometheus-compatible metrics endpoint
pub async fn metrics_handler(State(state): State<ServerState>) -> Response {
    let mut metrics = format!(
        r#"# HELP office_presence_verifications_total Total number of verifications run
# TYPE office_presence_verifications_total counter
office_presence_verifications_total {}

# HELP office_presence_allowed_total Verifications that allowed check-in
# TYPE office_presence_allowed_total counter
office_presence_allowed_total {}

# HELP office_presence_denied_total Verifications that denied check-in
# TYPE office_presence_denied_total counter
office_presence_denied_total {}

# HELP office_presence_offices Number of registered offices
# TYPE office_presence_offices gauge
office_presence_offices {}

# HELP office_presence_signal_failures_total Signals that were unavailable, by reason
# TYPE office_presence_signal_failures_total counter
"#,
        state.stats.total_verifications(),
        state.stats.allowed(),
        state.stats.denied(),
        state.registry.offices().len(),
    );

    for failure in FailureType::iter() {
        // Writing to a String cannot fail
        let _ = writeln!(
            metrics,
            "office_presence_signal_failures_total{{reason=\"{}\"}} {}",
            failure.metric_label(),
            state.stats.get_failure_count(failure)
        );
    }

    (StatusCode::OK, metrics).into_response()
}
