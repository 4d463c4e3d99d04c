//! Reservation repository implementation
//!
//! Writes that depend on the overlap check take a `&mut PgConnection` so the
//! reservation service can run them inside its transaction.

use sqlx::{Executor, PgConnection, PgPool, Postgres};
use chrono::{DateTime, Utc};
use crate::models::reservation::{Reservation, ReservationFilter, ReservationStatus, NewReservation};
use crate::utils::errors::ReserveHubError;

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a pending reservation
    pub async fn insert(conn: &mut PgConnection, reservation: NewReservation) -> Result<Reservation, ReserveHubError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at
            "#
        )
        .bind(reservation.user_id)
        .bind(reservation.resource_id)
        .bind(reservation.event_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(ReservationStatus::Pending.as_str())
        .bind(reservation.notes)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(conn)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Reservation"))?;

        Ok(reservation)
    }

    /// All reservations on a resource, whatever their status
    pub async fn find_for_resource<'e, E>(executor: E, resource_id: i64) -> Result<Vec<Reservation>, ReserveHubError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT id, user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at FROM reservations WHERE resource_id = $1 ORDER BY start_time ASC"
        )
        .bind(resource_id)
        .fetch_all(executor)
        .await?;

        Ok(reservations)
    }

    /// Reservations on a resource, for the resource detail endpoint
    pub async fn list_for_resource(&self, resource_id: i64) -> Result<Vec<Reservation>, ReserveHubError> {
        Self::find_for_resource(&self.pool, resource_id).await
    }

    /// Find reservation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, ReserveHubError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT id, user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at FROM reservations WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// List reservations matching the filter, most recent first
    pub async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, ReserveHubError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at
            FROM reservations
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR resource_id = $2)
              AND ($3::BIGINT IS NULL OR user_id = $3)
            ORDER BY start_time DESC
            "#
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.resource_id)
        .bind(filter.user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    /// Set the status of a reservation
    pub async fn update_status<'e, E>(executor: E, id: i64, status: ReservationStatus) -> Result<Reservation, ReserveHubError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(executor)
        .await?;

        reservation.ok_or_else(|| ReserveHubError::not_found("Reservation", id))
    }

    /// Change the interval and notes of a reservation
    pub async fn update_details(
        conn: &mut PgConnection,
        id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Reservation, ReserveHubError> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET start_time = $2,
                end_time = $3,
                notes = COALESCE($4, notes),
                updated_at = $5
            WHERE id = $1
            RETURNING id, user_id, resource_id, event_id, start_time, end_time, status, notes, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(start_time)
        .bind(end_time)
        .bind(notes)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?;

        reservation.ok_or_else(|| ReserveHubError::not_found("Reservation", id))
    }

    /// Delete reservation
    pub async fn delete(&self, id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count reservations grouped by status, optionally for one user
    pub async fn count_by_status(&self, user_id: Option<i64>) -> Result<Vec<(String, i64)>, ReserveHubError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*)
            FROM reservations
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
            GROUP BY status
            ORDER BY status
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
