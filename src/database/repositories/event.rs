//! Event repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::event::{Event, EventFilter, EventStatus, CreateEventRequest, UpdateEventRequest};
use crate::models::resource::Resource;
use crate::utils::errors::ReserveHubError;

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event together with its initial resource links
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, ReserveHubError> {
        let mut tx = self.pool.begin().await?;
        let status = request.status.unwrap_or(EventStatus::Planned);

        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, start_date, end_date, location, status, organizer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, start_date, end_date, location, status, organizer_id, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.location)
        .bind(status.as_str())
        .bind(request.organizer_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Event"))?;

        for resource_id in request.resource_ids {
            sqlx::query(
                "INSERT INTO event_resources (event_id, resource_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
            )
            .bind(event.id)
            .bind(resource_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ReserveHubError::from_db_unique(e, "Event resource"))?;
        }

        tx.commit().await?;
        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, ReserveHubError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, start_date, end_date, location, status, organizer_id, created_at, updated_at FROM events WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// List events, optionally by status
    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, ReserveHubError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, start_date, end_date, location, status, organizer_id, created_at, updated_at
            FROM events
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY start_date ASC
            "#
        )
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Update event
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, ReserveHubError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                location = COALESCE($6, location),
                status = COALESCE($7, status),
                updated_at = $8
            WHERE id = $1
            RETURNING id, title, description, start_date, end_date, location, status, organizer_id, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.location)
        .bind(request.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        event.ok_or_else(|| ReserveHubError::not_found("Event", id))
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Link a resource to an event
    pub async fn attach_resource(&self, event_id: i64, resource_id: i64) -> Result<(), ReserveHubError> {
        sqlx::query(
            "INSERT INTO event_resources (event_id, resource_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        )
        .bind(event_id)
        .bind(resource_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Event resource"))?;

        Ok(())
    }

    /// Unlink a resource from an event
    pub async fn detach_resource(&self, event_id: i64, resource_id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM event_resources WHERE event_id = $1 AND resource_id = $2")
            .bind(event_id)
            .bind(resource_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resources linked to an event
    pub async fn get_resources(&self, event_id: i64) -> Result<Vec<Resource>, ReserveHubError> {
        let resources = sqlx::query_as::<_, Resource>(
            r#"
            SELECT r.id, r.name, r.description, r.category_id, r.location, r.capacity, r.status, r.created_at, r.updated_at
            FROM resources r
            INNER JOIN event_resources er ON r.id = er.resource_id
            WHERE er.event_id = $1
            ORDER BY r.name ASC
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(resources)
    }

    /// Count events starting in the future
    pub async fn count_upcoming(&self) -> Result<i64, ReserveHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE start_date > NOW()")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, ReserveHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
