//! User management handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiJson, ApiPath};
use crate::middleware::CurrentUser;
use crate::models::{CreateUserRequest, Role, UpdateUserRequest, User};
use crate::state::AppState;
use crate::utils::errors::Result;

/// Handle `GET /api/users` (admin, manager)
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<User>>> {
    current.require(Role::STAFF)?;
    Ok(Json(state.services.user_service.list().await?))
}

/// Handle `GET /api/users/{id}` (admin, manager or the user themselves)
pub async fn get_user(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<User>> {
    Ok(Json(state.services.user_service.get(&current, id).await?))
}

/// Handle `POST /api/users` (admin)
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let actor = current.require(Role::ADMIN_ONLY)?;
    let user = state.services.user_service.create(actor, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handle `PUT /api/users/{id}`
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>> {
    Ok(Json(state.services.user_service.update(&current, id, request).await?))
}

/// Handle `DELETE /api/users/{id}` (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    let actor = current.require(Role::ADMIN_ONLY)?;
    state.services.user_service.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
