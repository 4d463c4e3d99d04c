//! User service implementation
//!
//! Account management on top of the user repository: field validation,
//! email normalization and the rules about who may change which fields.

use tracing::info;
use crate::database::repositories::UserRepository;
use crate::models::{User, Role, CreateUserRequest, UpdateUserRequest};
use crate::services::auth::require_owner_or_staff;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::{is_valid_email, normalize_email, require_text};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn get(&self, actor: &User, id: i64) -> Result<User> {
        require_owner_or_staff(actor, id)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReserveHubError::not_found("User", id))
    }

    /// Create an account with any role
    pub async fn create(&self, actor: &User, request: CreateUserRequest) -> Result<User> {
        let request = validate_create(request)?;
        let user = self.users.create(request).await?;

        log_admin_action(actor.id, "create_user", Some(user.email.as_str()), Some(user.role.as_str()));
        Ok(user)
    }

    /// Update an account; only admins may change roles or other people's accounts
    pub async fn update(&self, actor: &User, id: i64, request: UpdateUserRequest) -> Result<User> {
        let is_admin = actor.has_any_role(Role::ADMIN_ONLY);
        if !is_admin && actor.id != id {
            return Err(ReserveHubError::PermissionDenied(
                "You can only update your own account".to_string()
            ));
        }
        if !is_admin && request.role.is_some() {
            return Err(ReserveHubError::PermissionDenied(
                "Only administrators can change roles".to_string()
            ));
        }

        let request = validate_update(request)?;
        let user = self.users.update(id, request).await?;

        info!(user_id = id, actor_id = actor.id, "User updated");
        Ok(user)
    }

    /// Delete an account other than the caller's own
    pub async fn delete(&self, actor: &User, id: i64) -> Result<()> {
        if actor.id == id {
            return Err(ReserveHubError::InvalidInput(
                "You cannot delete your own account".to_string()
            ));
        }

        if !self.users.delete(id).await? {
            return Err(ReserveHubError::not_found("User", id));
        }

        log_admin_action(actor.id, "delete_user", Some(id.to_string().as_str()), None);
        Ok(())
    }
}

fn validate_create(mut request: CreateUserRequest) -> Result<CreateUserRequest> {
    request.email = normalize_email(&request.email);
    if !is_valid_email(&request.email) {
        return Err(ReserveHubError::InvalidInput(format!("Invalid email: {}", request.email)));
    }
    if request.password.is_empty() {
        return Err(ReserveHubError::InvalidInput("Password is required".to_string()));
    }
    request.first_name = require_text(&request.first_name)
        .ok_or_else(|| ReserveHubError::InvalidInput("First name is required".to_string()))?;
    request.last_name = require_text(&request.last_name)
        .ok_or_else(|| ReserveHubError::InvalidInput("Last name is required".to_string()))?;

    Ok(request)
}

fn validate_update(mut request: UpdateUserRequest) -> Result<UpdateUserRequest> {
    if let Some(email) = request.email.take() {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(ReserveHubError::InvalidInput(format!("Invalid email: {}", email)));
        }
        request.email = Some(email);
    }
    if matches!(request.password.as_deref(), Some("")) {
        return Err(ReserveHubError::InvalidInput("Password cannot be empty".to_string()));
    }

    Ok(request)
}
