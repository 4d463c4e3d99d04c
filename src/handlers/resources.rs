//! Resource handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::models::{
    CreateResourceRequest, Reservation, Resource, ResourceFilter, Role, UpdateResourceRequest,
};
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::require_text;
use crate::utils::logging::log_admin_action;

/// `?start=&end=` window for the availability search
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Handle `GET /api/resources?category_id=&status=`
pub async fn list_resources(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiQuery(filter): ApiQuery<ResourceFilter>,
) -> Result<Json<Vec<Resource>>> {
    Ok(Json(state.db.resources.list(&filter).await?))
}

/// Handle `GET /api/resources/available?start=&end=`
pub async fn list_available_resources(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiQuery(window): ApiQuery<AvailabilityQuery>,
) -> Result<Json<Vec<Resource>>> {
    if window.start >= window.end {
        return Err(ReserveHubError::InvalidInput("start must be before end".to_string()));
    }

    Ok(Json(state.db.resources.find_available(window.start, window.end).await?))
}

/// Handle `GET /api/resources/{id}`
pub async fn get_resource(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Resource>> {
    let resource = state.db.resources.find_by_id(id).await?
        .ok_or_else(|| ReserveHubError::not_found("Resource", id))?;
    Ok(Json(resource))
}

/// Handle `GET /api/resources/{id}/reservations`
pub async fn list_resource_reservations(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<Reservation>>> {
    if state.db.resources.find_by_id(id).await?.is_none() {
        return Err(ReserveHubError::not_found("Resource", id));
    }

    Ok(Json(state.db.reservations.list_for_resource(id).await?))
}

/// Handle `POST /api/resources` (admin, manager)
pub async fn create_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(mut request): ApiJson<CreateResourceRequest>,
) -> Result<(StatusCode, Json<Resource>)> {
    let actor = current.require(Role::STAFF)?;
    request.name = require_text(&request.name)
        .ok_or_else(|| ReserveHubError::InvalidInput("Name is required".to_string()))?;
    validate_capacity(request.capacity)?;

    let resource = state.db.resources.create(request).await?;
    log_admin_action(actor.id, "create_resource", Some(resource.name.as_str()), None);
    Ok((StatusCode::CREATED, Json(resource)))
}

/// Handle `PUT /api/resources/{id}` (admin, manager)
pub async fn update_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdateResourceRequest>,
) -> Result<Json<Resource>> {
    let actor = current.require(Role::STAFF)?;
    if let Some(name) = request.name.take() {
        request.name = Some(require_text(&name)
            .ok_or_else(|| ReserveHubError::InvalidInput("Name cannot be empty".to_string()))?);
    }
    validate_capacity(request.capacity)?;

    let status = request.status.map(|s| s.as_str());
    let resource = state.db.resources.update(id, request).await?;
    log_admin_action(actor.id, "update_resource", Some(id.to_string().as_str()), status);
    Ok(Json(resource))
}

/// Handle `DELETE /api/resources/{id}` (admin, manager)
pub async fn delete_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    let actor = current.require(Role::STAFF)?;
    if !state.db.resources.delete(id).await? {
        return Err(ReserveHubError::not_found("Resource", id));
    }

    log_admin_action(actor.id, "delete_resource", Some(id.to_string().as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}

fn validate_capacity(capacity: Option<i32>) -> Result<()> {
    match capacity {
        Some(c) if c < 0 => Err(ReserveHubError::InvalidInput(
            "Capacity cannot be negative".to_string()
        )),
        _ => Ok(()),
    }
}
