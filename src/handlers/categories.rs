//! Category handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiJson, ApiPath};
use crate::middleware::CurrentUser;
use crate::models::{Category, CreateCategoryRequest, Role, UpdateCategoryRequest};
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::require_text;
use crate::utils::logging::log_admin_action;

/// Handle `GET /api/categories`
pub async fn list_categories(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.db.categories.list().await?))
}

/// Handle `GET /api/categories/{id}`
pub async fn get_category(
    State(state): State<AppState>,
    _current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Category>> {
    let category = state.db.categories.find_by_id(id).await?
        .ok_or_else(|| ReserveHubError::not_found("Category", id))?;
    Ok(Json(category))
}

/// Handle `POST /api/categories` (admin, manager)
pub async fn create_category(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(mut request): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let actor = current.require(Role::STAFF)?;
    request.name = require_text(&request.name)
        .ok_or_else(|| ReserveHubError::InvalidInput("Name is required".to_string()))?;

    let category = state.db.categories.create(request).await?;
    log_admin_action(actor.id, "create_category", Some(category.name.as_str()), None);
    Ok((StatusCode::CREATED, Json(category)))
}

/// Handle `PUT /api/categories/{id}` (admin, manager)
pub async fn update_category(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut request): ApiJson<UpdateCategoryRequest>,
) -> Result<Json<Category>> {
    current.require(Role::STAFF)?;
    if let Some(name) = request.name.take() {
        request.name = Some(require_text(&name)
            .ok_or_else(|| ReserveHubError::InvalidInput("Name cannot be empty".to_string()))?);
    }

    Ok(Json(state.db.categories.update(id, request).await?))
}

/// Handle `DELETE /api/categories/{id}` (admin, manager)
pub async fn delete_category(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    let actor = current.require(Role::STAFF)?;
    if !state.db.categories.delete(id).await? {
        return Err(ReserveHubError::not_found("Category", id));
    }

    log_admin_action(actor.id, "delete_category", Some(id.to_string().as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}
