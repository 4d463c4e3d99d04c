//! Event handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};

use super::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::models::event::is_valid_event_window;
use crate::models::{
    AttachResourceRequest, CreateEventRequest, Event, EventDetails, EventFilter, Role,
    UpdateEventRequest,
};
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::require_text;
use crate::utils::logging::log_admin_action;

/// Handle `GET /api/events?status=`
pub async fn list_events(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiQuery(filter): ApiQuery<EventFilter>,
) -> Result<Json<Vec<Event>>> {
    Ok(Json(state.db.events.list(&filter).await?))
}

/// Handle `GET /api/events/{id}`; the event comes with its resources
pub async fn get_event(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<EventDetails>> {
    Ok(Json(state.db.get_event_details(id).await?))
}

/// Handle `POST /api/events` (admin, manager)
pub async fn create_event(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(mut request): ApiJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDetails>)> {
    let actor = current.require(Role::STAFF)?;
    request.title = require_text(&request.title)
        .ok_or_else(|| ReserveHubError::InvalidInput("Title is required".to_string()))?;
    check_window(request.start_date, request.end_date)?;
    request.organizer_id.get_or_insert(actor.id);

    let event = state.db.events.create(request).await?;
    log_admin_action(actor.id, "create_event", Some(event.title.as_str()), None);

    let details = state.db.get_event_details(event.id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// Handle `PUT /api/events/{id}` (admin, manager)
pub async fn update_event(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdateEventRequest>,
) -> Result<Json<Event>> {
    current.require(Role::STAFF)?;
    if let Some(title) = request.title.take() {
        request.title = Some(require_text(&title)
            .ok_or_else(|| ReserveHubError::InvalidInput("Title cannot be empty".to_string()))?);
    }

    // The window is checked against the merged result, not just the submitted fields
    let current_event = state.db.events.find_by_id(id).await?
        .ok_or_else(|| ReserveHubError::not_found("Event", id))?;
    let start = request.start_date.unwrap_or(current_event.start_date);
    let end = request.end_date.or(current_event.end_date);
    check_window(start, end)?;

    Ok(Json(state.db.events.update(id, request).await?))
}

/// Handle `DELETE /api/events/{id}` (admin, manager)
pub async fn delete_event(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    let actor = current.require(Role::STAFF)?;
    if !state.db.events.delete(id).await? {
        return Err(ReserveHubError::not_found("Event", id));
    }

    log_admin_action(actor.id, "delete_event", Some(id.to_string().as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `POST /api/events/{id}/resources` (admin, manager)
pub async fn attach_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<AttachResourceRequest>,
) -> Result<Json<EventDetails>> {
    current.require(Role::STAFF)?;
    if state.db.events.find_by_id(id).await?.is_none() {
        return Err(ReserveHubError::not_found("Event", id));
    }
    if state.db.resources.find_by_id(request.resource_id).await?.is_none() {
        return Err(ReserveHubError::not_found("Resource", request.resource_id));
    }

    state.db.events.attach_resource(id, request.resource_id).await?;
    Ok(Json(state.db.get_event_details(id).await?))
}

/// Handle `DELETE /api/events/{id}/resources/{resource_id}` (admin, manager)
pub async fn detach_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath((id, resource_id)): ApiPath<(i64, i64)>,
) -> Result<StatusCode> {
    current.require(Role::STAFF)?;
    if !state.db.events.detach_resource(id, resource_id).await? {
        return Err(ReserveHubError::NotFound {
            entity: "Event resource",
            id: format!("{}/{}", id, resource_id),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

fn check_window(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<()> {
    if is_valid_event_window(start, end) {
        Ok(())
    } else {
        Err(ReserveHubError::InvalidInput(
            "start_date must not be after end_date".to_string()
        ))
    }
}
