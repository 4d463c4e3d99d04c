//! Authentication middleware
//!
//! Resolves the caller from the `x-user-id` header. Handlers that need an
//! identity take [`CurrentUser`] as an argument; a missing, malformed or
//! unknown id rejects the request with 401 before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::debug;

use crate::models::{Role, User};
use crate::services::auth::{require_role, USER_ID_HEADER};
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Fail with 403 unless the caller holds one of `roles`
    pub fn require(&self, roles: &[Role]) -> Result<&User> {
        require_role(&self.0, roles)?;
        Ok(&self.0)
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ReserveHubError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = match parts.headers.get(USER_ID_HEADER) {
            Some(value) => Some(value.to_str().map_err(|_| {
                ReserveHubError::Authentication("Invalid user id header".to_string())
            })?),
            None => None,
        };

        let user = state.services.auth_service.authenticate(header).await?;
        debug!(user_id = user.id, role = %user.role, "Request authenticated");

        Ok(CurrentUser(user))
    }
}
