//! Resource repository implementation

use sqlx::{PgConnection, PgPool};
use chrono::{DateTime, Utc};
use crate::models::resource::{Resource, ResourceFilter, ResourceStatus, CreateResourceRequest, UpdateResourceRequest};
use crate::models::reservation::ReservationStatus;
use crate::utils::errors::ReserveHubError;

#[derive(Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new resource
    pub async fn create(&self, request: CreateResourceRequest) -> Result<Resource, ReserveHubError> {
        let status = request.status.unwrap_or(ResourceStatus::Available);
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (name, description, category_id, location, capacity, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, category_id, location, capacity, status, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(request.category_id)
        .bind(request.location)
        .bind(request.capacity)
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Resource"))?;

        Ok(resource)
    }

    /// Find resource by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Resource>, ReserveHubError> {
        let resource = sqlx::query_as::<_, Resource>(
            "SELECT id, name, description, category_id, location, capacity, status, created_at, updated_at FROM resources WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(resource)
    }

    /// Fetch a resource and lock its row until the surrounding transaction ends
    ///
    /// Every writer that checks reservation overlaps for a resource takes
    /// this lock first, which serializes those writers per resource.
    pub async fn lock_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<Resource>, ReserveHubError> {
        let resource = sqlx::query_as::<_, Resource>(
            "SELECT id, name, description, category_id, location, capacity, status, created_at, updated_at FROM resources WHERE id = $1 FOR UPDATE"
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(resource)
    }

    /// List resources, optionally filtered by category and status
    pub async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, ReserveHubError> {
        let resources = sqlx::query_as::<_, Resource>(
            r#"
            SELECT id, name, description, category_id, location, capacity, status, created_at, updated_at
            FROM resources
            WHERE ($1::BIGINT IS NULL OR category_id = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY name ASC
            "#
        )
        .bind(filter.category_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(resources)
    }

    /// Resources marked available with no slot-holding reservation overlapping `[start, end)`
    pub async fn find_available(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Resource>, ReserveHubError> {
        let resources = sqlx::query_as::<_, Resource>(
            r#"
            SELECT r.id, r.name, r.description, r.category_id, r.location, r.capacity, r.status, r.created_at, r.updated_at
            FROM resources r
            WHERE r.status = $1
              AND NOT EXISTS (
                  SELECT 1 FROM reservations res
                  WHERE res.resource_id = r.id
                    AND res.status = ANY($2)
                    AND res.start_time < $4
                    AND res.end_time > $3
              )
            ORDER BY r.name ASC
            "#
        )
        .bind(ResourceStatus::Available.as_str())
        .bind(&ReservationStatus::BLOCKING[..])
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(resources)
    }

    /// Update resource
    pub async fn update(&self, id: i64, request: UpdateResourceRequest) -> Result<Resource, ReserveHubError> {
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            UPDATE resources
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                location = COALESCE($5, location),
                capacity = COALESCE($6, capacity),
                status = COALESCE($7, status),
                updated_at = $8
            WHERE id = $1
            RETURNING id, name, description, category_id, location, capacity, status, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.category_id)
        .bind(request.location)
        .bind(request.capacity)
        .bind(request.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Resource"))?;

        resource.ok_or_else(|| ReserveHubError::not_found("Resource", id))
    }

    /// Delete resource
    pub async fn delete(&self, id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count resources grouped by status
    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>, ReserveHubError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM resources GROUP BY status ORDER BY status"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
