//! `POST /verify` handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{DeviceSignals, ServerState};

/// Runs one verification with the submitted device signals
pub async fn verify_handler(
    State(state): State<ServerState>,
    Json(signals): Json<DeviceSignals>,
) -> Response {
    let engine = match state.engine_for(&signals) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Failed to build verification engine: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let result = engine.verify().await;
    state.store_result(&result);
    (StatusCode::OK, Json(result)).into_response()
}
