//! Reservation service implementation
//!
//! Creation, rescheduling, confirmation and cancellation all follow the same
//! shape: open a transaction, lock the resource row, load the resource's
//! reservations, check the current state, write, commit. The row lock makes
//! concurrent requests for the same resource wait for each other, so two
//! overlapping requests cannot both pass the check.

use sqlx::PgConnection;
use tracing::{info, warn};
use crate::config::ReservationConfig;
use crate::database::repositories::{EventRepository, ResourceRepository, ReservationRepository};
use crate::models::reservation::{find_conflict, Reservation, ReservationStatus, NewReservation, CreateReservationRequest, UpdateReservationRequest};
use crate::models::{NotificationKind, Resource, User};
use crate::services::auth::require_owner_or_staff;
use crate::services::notification::NotificationService;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::logging::log_reservation_action;

#[derive(Clone)]
pub struct ReservationService {
    reservations: ReservationRepository,
    events: EventRepository,
    notifications: NotificationService,
    config: ReservationConfig,
}

impl ReservationService {
    pub fn new(
        reservations: ReservationRepository,
        events: EventRepository,
        notifications: NotificationService,
        config: ReservationConfig,
    ) -> Self {
        Self {
            reservations,
            events,
            notifications,
            config,
        }
    }

    /// Request a resource for an interval on behalf of `requester`
    pub async fn create(&self, requester: &User, request: CreateReservationRequest) -> Result<Reservation> {
        let new_reservation = validate_create_request(requester.id, request)?;

        if let Some(event_id) = new_reservation.event_id {
            if self.events.find_by_id(event_id).await?.is_none() {
                return Err(ReserveHubError::not_found("Event", event_id));
            }
        }

        let mut tx = self.reservations.pool().begin().await?;

        let resource = ResourceRepository::lock_for_update(&mut tx, new_reservation.resource_id)
            .await?
            .ok_or_else(|| ReserveHubError::not_found("Resource", new_reservation.resource_id))?;

        if self.config.require_available_resource && !resource.is_available() {
            return Err(ReserveHubError::Conflict(format!(
                "Resource '{}' is {} and cannot be reserved",
                resource.name, resource.status
            )));
        }

        let existing = ReservationRepository::find_for_resource(&mut *tx, resource.id).await?;
        if let Some(conflict) = find_conflict(&existing, new_reservation.start_time, new_reservation.end_time, None) {
            warn!(
                resource_id = resource.id,
                conflicting_reservation = conflict.id,
                "Reservation rejected: slot already taken"
            );
            return Err(slot_taken(conflict));
        }

        let reservation = ReservationRepository::insert(&mut tx, new_reservation).await?;
        tx.commit().await?;

        log_reservation_action(reservation.id, "create", requester.id, None);

        // The reservation is committed; a failed notification must not undo it
        match self.notifications.reservation_requested(&reservation, &resource, requester).await {
            Ok(report) if !report.failed.is_empty() => {
                warn!(reservation_id = reservation.id, failed = report.failed.len(), "Some notifications were not stored");
            }
            Ok(_) => {}
            Err(e) => warn!(reservation_id = reservation.id, error = %e, "Failed to notify about reservation"),
        }

        Ok(reservation)
    }

    /// Confirm or reject a pending reservation
    pub async fn update_status(&self, actor: &User, id: i64, status: ReservationStatus) -> Result<Reservation> {
        if !matches!(status, ReservationStatus::Confirmed | ReservationStatus::Rejected) {
            return Err(ReserveHubError::InvalidInput(
                "Status can only be set to confirmed or rejected; use cancel to cancel".to_string()
            ));
        }

        let resource_id = self.find(id).await?.resource_id;
        let mut tx = self.reservations.pool().begin().await?;
        let (resource, existing, current) = lock_reservation(&mut tx, resource_id, id).await?;
        check_transition(&current, status)?;

        if status == ReservationStatus::Confirmed {
            let confirmed: Vec<Reservation> = existing
                .into_iter()
                .filter(|r| r.status == ReservationStatus::Confirmed.as_str())
                .collect();
            if let Some(conflict) = find_conflict(&confirmed, current.start_time, current.end_time, Some(id)) {
                return Err(slot_taken(conflict));
            }
        }

        let updated = ReservationRepository::update_status(&mut *tx, id, status).await?;
        tx.commit().await?;

        log_reservation_action(id, status.as_str(), actor.id, None);
        let kind = match status {
            ReservationStatus::Confirmed => NotificationKind::ReservationConfirmed,
            _ => NotificationKind::ReservationRejected,
        };
        self.notify_requester(&updated, &resource, kind).await;

        Ok(updated)
    }

    /// Cancel a pending or confirmed reservation
    pub async fn cancel(&self, actor: &User, id: i64) -> Result<Reservation> {
        let before = self.find(id).await?;
        require_owner_or_staff(actor, before.user_id)?;

        let mut tx = self.reservations.pool().begin().await?;
        let (resource, _, current) = lock_reservation(&mut tx, before.resource_id, id).await?;
        check_transition(&current, ReservationStatus::Cancelled)?;

        let updated = ReservationRepository::update_status(&mut *tx, id, ReservationStatus::Cancelled).await?;
        tx.commit().await?;

        log_reservation_action(id, "cancel", actor.id, None);
        if actor.id != updated.user_id {
            self.notify_requester(&updated, &resource, NotificationKind::ReservationCancelled).await;
        }

        Ok(updated)
    }

    /// Reschedule a reservation or change its notes
    pub async fn update(&self, actor: &User, id: i64, request: UpdateReservationRequest) -> Result<Reservation> {
        let before = self.find(id).await?;
        require_owner_or_staff(actor, before.user_id)?;
        check_modifiable(actor, &before)?;

        let mut tx = self.reservations.pool().begin().await?;
        let (_, existing, current) = lock_reservation(&mut tx, before.resource_id, id).await?;
        check_modifiable(actor, &current)?;

        let start_time = request.start_time.unwrap_or(current.start_time);
        let end_time = request.end_time.unwrap_or(current.end_time);
        if start_time >= end_time {
            return Err(ReserveHubError::InvalidInput(
                "start_time must be before end_time".to_string()
            ));
        }

        if let Some(conflict) = find_conflict(&existing, start_time, end_time, Some(id)) {
            return Err(slot_taken(conflict));
        }

        let updated = ReservationRepository::update_details(&mut tx, id, start_time, end_time, request.notes).await?;
        tx.commit().await?;

        log_reservation_action(id, "update", actor.id, None);
        Ok(updated)
    }

    /// Fetch a reservation or fail with 404
    pub async fn find(&self, id: i64) -> Result<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReserveHubError::not_found("Reservation", id))
    }

    async fn notify_requester(&self, reservation: &Reservation, resource: &Resource, kind: NotificationKind) {
        match self.notifications.reservation_status_changed(reservation, resource, kind).await {
            Ok(_) => info!(reservation_id = reservation.id, kind = kind.as_str(), "Requester notified"),
            Err(e) => warn!(reservation_id = reservation.id, error = %e, "Failed to notify requester"),
        }
    }
}

/// Lock the resource row and re-read its reservations, including `id`
///
/// Every status or interval change goes through here, so writers to the same
/// resource see each other's committed state.
async fn lock_reservation(
    conn: &mut PgConnection,
    resource_id: i64,
    id: i64,
) -> Result<(Resource, Vec<Reservation>, Reservation)> {
    let resource = ResourceRepository::lock_for_update(&mut *conn, resource_id)
        .await?
        .ok_or_else(|| ReserveHubError::not_found("Resource", resource_id))?;

    let existing = ReservationRepository::find_for_resource(&mut *conn, resource_id).await?;
    let current = existing
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| ReserveHubError::not_found("Reservation", id))?;

    Ok((resource, existing, current))
}

fn check_modifiable(actor: &User, reservation: &Reservation) -> Result<()> {
    if !actor.is_staff() && reservation.status() != Some(ReservationStatus::Pending) {
        return Err(ReserveHubError::PermissionDenied(
            "Only pending reservations can be modified".to_string()
        ));
    }
    if !reservation.blocks_slot() {
        return Err(ReserveHubError::Conflict(format!(
            "Reservation {} is {} and cannot be modified",
            reservation.id, reservation.status
        )));
    }
    Ok(())
}

/// Check required fields and the interval of a new reservation
pub fn validate_create_request(user_id: i64, request: CreateReservationRequest) -> Result<NewReservation> {
    let (resource_id, start_time, end_time) = match (request.resource_id, request.start_time, request.end_time) {
        (Some(resource_id), Some(start), Some(end)) => (resource_id, start, end),
        _ => {
            return Err(ReserveHubError::InvalidInput(
                "resource_id, start_time and end_time are required".to_string()
            ))
        }
    };

    if start_time >= end_time {
        return Err(ReserveHubError::InvalidInput(
            "start_time must be before end_time".to_string()
        ));
    }

    Ok(NewReservation {
        user_id,
        resource_id,
        event_id: request.event_id,
        start_time,
        end_time,
        notes: request.notes,
    })
}

fn check_transition(current: &Reservation, next: ReservationStatus) -> Result<()> {
    let allowed = current.status().map_or(false, |s| s.can_transition_to(next));
    if allowed {
        Ok(())
    } else {
        Err(ReserveHubError::Conflict(format!(
            "Reservation {} cannot go from {} to {}",
            current.id, current.status, next
        )))
    }
}

fn slot_taken(conflict: &Reservation) -> ReserveHubError {
    ReserveHubError::Conflict(format!(
        "Resource is already reserved from {} to {}",
        conflict.start_time.to_rfc3339(),
        conflict.end_time.to_rfc3339()
    ))
}
