//! Dashboard handlers

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::middleware::CurrentUser;
use crate::models::Role;
use crate::state::AppState;
use crate::utils::errors::Result;

/// Handle `GET /api/dashboard/stats` (admin, manager)
pub async fn system_stats(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>> {
    current.require(Role::STAFF)?;
    Ok(Json(state.db.get_system_stats().await?))
}

/// Handle `GET /api/dashboard/me`
pub async fn my_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>> {
    Ok(Json(state.db.get_user_dashboard(current.id).await?))
}
