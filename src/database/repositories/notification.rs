//! Notification repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::notification::{Notification, CreateNotificationRequest};
use crate::utils::errors::ReserveHubError;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateNotificationRequest) -> Result<Notification, ReserveHubError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, title, message, kind, is_read, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING id, user_id, title, message, kind, is_read, created_at
            "#
        )
        .bind(request.user_id)
        .bind(request.title)
        .bind(request.message)
        .bind(request.kind.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Notifications of a user, newest first
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>, ReserveHubError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, title, message, kind, is_read, created_at FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn count_unread(&self, user_id: i64) -> Result<i64, ReserveHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE"
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Mark one notification read; scoped to its owner
    pub async fn mark_read(&self, id: i64, user_id: i64) -> Result<Option<Notification>, ReserveHubError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, message, kind, is_read, created_at
            "#
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, ReserveHubError> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete one notification; scoped to its owner
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
