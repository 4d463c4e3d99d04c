//! Reservation handlers
//!
//! Scheduling rules live in the reservation service; these handlers only
//! pick the caller's scope and translate the outcome into a response.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::models::{
    CreateReservationRequest, Reservation, ReservationFilter, Role, UpdateReservationRequest,
    UpdateReservationStatusRequest, User,
};
use crate::services::require_owner_or_staff;
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::logging::log_reservation_action;

/// Handle `GET /api/reservations?status=&resource_id=&user_id=`
///
/// Staff see everything matching the filters; clients only their own.
pub async fn list_reservations(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiQuery(filter): ApiQuery<ReservationFilter>,
) -> Result<Json<Vec<Reservation>>> {
    let filter = scope_filter(&current, filter);
    Ok(Json(state.db.reservations.list(&filter).await?))
}

/// Handle `GET /api/reservations/mine`
pub async fn list_my_reservations(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<Reservation>>> {
    let filter = ReservationFilter {
        user_id: Some(current.id),
        ..Default::default()
    };
    Ok(Json(state.db.reservations.list(&filter).await?))
}

/// Handle `GET /api/reservations/{id}`
pub async fn get_reservation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Reservation>> {
    let reservation = state.services.reservation_service.find(id).await?;
    require_owner_or_staff(&current, reservation.user_id)?;
    Ok(Json(reservation))
}

/// Handle `POST /api/reservations`
pub async fn create_reservation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>)> {
    let reservation = state.services.reservation_service.create(&current, request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Handle `PUT /api/reservations/{id}`
pub async fn update_reservation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateReservationRequest>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.services.reservation_service.update(&current, id, request).await?))
}

/// Handle `PUT /api/reservations/{id}/status` (admin, manager)
pub async fn update_reservation_status(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateReservationStatusRequest>,
) -> Result<Json<Reservation>> {
    let actor = current.require(Role::STAFF)?;
    let reservation = state.services.reservation_service
        .update_status(actor, id, request.status)
        .await?;
    Ok(Json(reservation))
}

/// Handle `PUT /api/reservations/{id}/cancel`
pub async fn cancel_reservation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Reservation>> {
    Ok(Json(state.services.reservation_service.cancel(&current, id).await?))
}

/// Handle `DELETE /api/reservations/{id}` (admin)
pub async fn delete_reservation(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    let actor = current.require(Role::ADMIN_ONLY)?;
    if !state.db.reservations.delete(id).await? {
        return Err(ReserveHubError::not_found("Reservation", id));
    }

    log_reservation_action(id, "delete", actor.id, None);
    Ok(StatusCode::NO_CONTENT)
}

/// Clients are pinned to their own reservations whatever they ask for
fn scope_filter(user: &User, mut filter: ReservationFilter) -> ReservationFilter {
    if !user.is_staff() {
        filter.user_id = Some(user.id);
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReservationStatus;
    use chrono::Utc;

    fn user(id: i64, role: &str) -> User {
        User {
            id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("user{}@example.com", id),
            password: String::new(),
            role: role.to_string(),
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_client_filter_is_pinned_to_self() {
        let filter = ReservationFilter {
            status: Some(ReservationStatus::Pending),
            resource_id: Some(4),
            user_id: Some(99),
        };
        let scoped = scope_filter(&user(7, "client"), filter);
        assert_eq!(scoped.user_id, Some(7));
        assert_eq!(scoped.resource_id, Some(4));
        assert_eq!(scoped.status, Some(ReservationStatus::Pending));
    }

    #[test]
    fn test_staff_filter_is_untouched() {
        let scoped = scope_filter(&user(1, "manager"), ReservationFilter::default());
        assert_eq!(scoped.user_id, None);

        let filter = ReservationFilter {
            user_id: Some(5),
            ..Default::default()
        };
        assert_eq!(scope_filter(&user(1, "admin"), filter).user_id, Some(5));
    }
}
