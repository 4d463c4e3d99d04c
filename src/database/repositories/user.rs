//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::user::{User, Role, CreateUserRequest, UpdateUserRequest};
use crate::utils::errors::ReserveHubError;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, ReserveHubError> {
        let role = request.role.unwrap_or(Role::Client);
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password, role, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, first_name, last_name, email, password, role, phone, created_at, updated_at
            "#
        )
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.email)
        .bind(request.password)
        .bind(role.as_str())
        .bind(request.phone)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "User with this email"))?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ReserveHubError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, password, role, phone, created_at, updated_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ReserveHubError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, password, role, phone, created_at, updated_at FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, ReserveHubError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                password = COALESCE($5, password),
                role = COALESCE($6, role),
                phone = COALESCE($7, phone),
                updated_at = $8
            WHERE id = $1
            RETURNING id, first_name, last_name, email, password, role, phone, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.email)
        .bind(request.password)
        .bind(request.role.map(|r| r.as_str()))
        .bind(request.phone)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "User with this email"))?;

        user.ok_or_else(|| ReserveHubError::not_found("User", id))
    }

    /// Delete user
    pub async fn delete(&self, id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, ReserveHubError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, password, role, phone, created_at, updated_at FROM users ORDER BY id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// List users with the given role
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, ReserveHubError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, password, role, phone, created_at, updated_at FROM users WHERE role = $1 ORDER BY id ASC"
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count users grouped by role
    pub async fn count_by_role(&self) -> Result<Vec<(String, i64)>, ReserveHubError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
