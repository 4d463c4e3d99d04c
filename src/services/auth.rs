//! Authentication service implementation
//!
//! This service handles login, registration, resolution of the caller from
//! the `x-user-id` header and role-based access checks.

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use crate::database::repositories::UserRepository;
use crate::models::{User, Role, CreateUserRequest, LoginRequest, RegisterRequest};
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::{is_valid_email, normalize_email, require_text};

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authentication service for managing identities and access control
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Check an email/password pair and return the matching user
    pub async fn login(&self, request: LoginRequest) -> Result<User> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(ReserveHubError::InvalidInput(
                "Email and password are required".to_string()
            ));
        }

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                self.log_auth_event(None, "login", false, Some("unknown email"));
                return Err(ReserveHubError::Authentication("Invalid credentials".to_string()));
            }
        };

        if !passwords_match(&user.password, &request.password) {
            self.log_auth_event(Some(user.id), "login", false, Some("wrong password"));
            return Err(ReserveHubError::Authentication("Invalid credentials".to_string()));
        }

        self.log_auth_event(Some(user.id), "login", true, None);
        Ok(user)
    }

    /// Self-service signup; always creates a client account
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(ReserveHubError::InvalidInput(format!("Invalid email: {}", request.email)));
        }
        if request.password.is_empty() {
            return Err(ReserveHubError::InvalidInput("Password is required".to_string()));
        }
        let first_name = require_text(&request.first_name)
            .ok_or_else(|| ReserveHubError::InvalidInput("First name is required".to_string()))?;
        let last_name = require_text(&request.last_name)
            .ok_or_else(|| ReserveHubError::InvalidInput("Last name is required".to_string()))?;

        let user = self.users.create(CreateUserRequest {
            first_name,
            last_name,
            email,
            password: request.password,
            role: Some(Role::Client),
            phone: request.phone,
        }).await?;

        self.log_auth_event(Some(user.id), "register", true, None);
        Ok(user)
    }

    /// Resolve the caller from the raw `x-user-id` header value
    pub async fn authenticate(&self, header: Option<&str>) -> Result<User> {
        let user_id = parse_user_id(header)?;

        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            debug!(user_id = user_id, "Unknown user id in request header");
            ReserveHubError::Authentication("Unknown user".to_string())
        })?;

        Ok(user)
    }

    /// Log authentication event
    pub fn log_auth_event(&self, user_id: Option<i64>, action: &str, success: bool, details: Option<&str>) {
        if success {
            info!(
                user_id = user_id,
                action = action,
                details = details,
                "Authentication event: success"
            );
        } else {
            warn!(
                user_id = user_id,
                action = action,
                details = details,
                "Authentication event: failure"
            );
        }
    }
}

/// Parse the header value into a user id
pub fn parse_user_id(header: Option<&str>) -> Result<i64> {
    let raw = header
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ReserveHubError::Authentication("Missing user id header".to_string()))?;

    raw.parse::<i64>()
        .map_err(|_| ReserveHubError::Authentication(format!("Invalid user id: {}", raw)))
}

/// Pass iff the caller's role is in the allow-list
pub fn require_role(user: &User, allowed: &[Role]) -> Result<()> {
    if user.has_any_role(allowed) {
        Ok(())
    } else {
        warn!(user_id = user.id, role = %user.role, "Insufficient role");
        Err(ReserveHubError::PermissionDenied(format!(
            "Role '{}' is not allowed to perform this action",
            user.role
        )))
    }
}

/// Staff may act on anything; others only on their own records
pub fn require_owner_or_staff(user: &User, owner_id: i64) -> Result<()> {
    if user.is_staff() || user.id == owner_id {
        Ok(())
    } else {
        Err(ReserveHubError::PermissionDenied(
            "You can only access your own records".to_string()
        ))
    }
}

/// Compare stored and supplied passwords in constant time
pub fn passwords_match(stored: &str, supplied: &str) -> bool {
    stored.as_bytes().ct_eq(supplied.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn user(id: i64, role: &str) -> User {
        User {
            id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("user{}@example.com", id),
            password: "secret".to_string(),
            role: role.to_string(),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(Some("42")).unwrap(), 42);
        assert_eq!(parse_user_id(Some(" 7 ")).unwrap(), 7);
        assert_matches!(parse_user_id(None), Err(ReserveHubError::Authentication(_)));
        assert_matches!(parse_user_id(Some("")), Err(ReserveHubError::Authentication(_)));
        assert_matches!(parse_user_id(Some("abc")), Err(ReserveHubError::Authentication(_)));
    }

    #[test]
    fn test_require_role() {
        assert!(require_role(&user(1, "admin"), Role::STAFF).is_ok());
        assert!(require_role(&user(2, "manager"), Role::STAFF).is_ok());
        assert_matches!(
            require_role(&user(3, "client"), Role::STAFF),
            Err(ReserveHubError::PermissionDenied(_))
        );
        assert_matches!(
            require_role(&user(2, "manager"), Role::ADMIN_ONLY),
            Err(ReserveHubError::PermissionDenied(_))
        );
    }

    #[test]
    fn test_require_owner_or_staff() {
        assert!(require_owner_or_staff(&user(3, "client"), 3).is_ok());
        assert!(require_owner_or_staff(&user(3, "client"), 4).is_err());
        assert!(require_owner_or_staff(&user(1, "manager"), 4).is_ok());
    }

    #[test]
    fn test_passwords_match() {
        assert!(passwords_match("secret", "secret"));
        assert!(!passwords_match("secret", "Secret"));
        assert!(!passwords_match("secret", "secret "));
        assert!(!passwords_match("secret", ""));
    }
}
