//! Health check handler

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// Handle `GET /health`; 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let status = state.services.health_check().await;

    if status.is_healthy() {
        (StatusCode::OK, Json(json!({ "status": "ok", "version": crate::VERSION })))
    } else {
        let issues = status.get_issues();
        warn!(issues = ?issues, "Health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "issues": issues })),
        )
    }
}
