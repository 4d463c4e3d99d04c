//! Notification handlers
//!
//! Every route is scoped to the caller; another user's notification is
//! reported as missing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::ApiPath;
use crate::middleware::CurrentUser;
use crate::models::Notification;
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::logging::log_user_action;

/// Handle `GET /api/notifications`
pub async fn list_notifications(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Notification>>> {
    Ok(Json(state.db.notifications.list_for_user(current.id).await?))
}

/// Handle `GET /api/notifications/unread-count`
pub async fn unread_count(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>> {
    let count = state.db.notifications.count_unread(current.id).await?;
    Ok(Json(json!({ "count": count })))
}

/// Handle `PUT /api/notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Notification>> {
    let notification = state.db.notifications.mark_read(id, current.id).await?
        .ok_or_else(|| ReserveHubError::not_found("Notification", id))?;
    Ok(Json(notification))
}

/// Handle `PUT /api/notifications/read-all`
pub async fn mark_all_read(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>> {
    let updated = state.db.notifications.mark_all_read(current.id).await?;
    log_user_action(current.id, "mark_all_notifications_read", Some(updated.to_string().as_str()));
    Ok(Json(json!({ "updated": updated })))
}

/// Handle `DELETE /api/notifications/{id}`
pub async fn delete_notification(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    if !state.db.notifications.delete(id, current.id).await? {
        return Err(ReserveHubError::not_found("Notification", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
