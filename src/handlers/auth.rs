//! Authentication handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::ApiJson;
use crate::middleware::CurrentUser;
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::state::AppState;
use crate::utils::errors::Result;

/// Handle `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<User>> {
    let user = state.services.auth_service.login(request).await?;
    Ok(Json(user))
}

/// Handle `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.services.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handle `GET /api/auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
