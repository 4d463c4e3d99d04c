//! HTTP handlers module
//!
//! One module per entity. Each handler resolves the caller through
//! [`CurrentUser`](crate::middleware::CurrentUser) where the route is
//! protected, checks the route's role allow-list and then talks to the
//! services or repositories.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod notifications;
pub mod reservations;
pub mod resources;
pub mod site_config;
pub mod users;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::middleware::log_requests;
use crate::services::USER_ID_HEADER;
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};

/// JSON body whose rejections render as `{"message": ...}` with status 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ReserveHubError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor with the same error shape as [`ApiJson`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ReserveHubError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters extractor with the same error shape as [`ApiJson`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ReserveHubError))]
pub struct ApiPath<T>(pub T);

/// Build the application router with every API route and layer attached
pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.settings.server)?;

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/categories", get(categories::list_categories).post(categories::create_category))
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/resources", get(resources::list_resources).post(resources::create_resource))
        .route("/resources/available", get(resources::list_available_resources))
        .route(
            "/resources/{id}",
            get(resources::get_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource),
        )
        .route("/resources/{id}/reservations", get(resources::list_resource_reservations))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/{id}",
            get(events::get_event).put(events::update_event).delete(events::delete_event),
        )
        .route("/events/{id}/resources", post(events::attach_resource))
        .route(
            "/events/{id}/resources/{resource_id}",
            axum::routing::delete(events::detach_resource),
        )
        .route(
            "/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/reservations/mine", get(reservations::list_my_reservations))
        .route(
            "/reservations/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
        .route("/reservations/{id}/status", put(reservations::update_reservation_status))
        .route("/reservations/{id}/cancel", put(reservations::cancel_reservation))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/notifications/{id}", axum::routing::delete(notifications::delete_notification))
        .route("/notifications/{id}/read", put(notifications::mark_read))
        .route("/site-config", get(site_config::get_site_config).put(site_config::update_site_config))
        .route("/site-config/{key}", axum::routing::delete(site_config::delete_site_config_key))
        .route("/dashboard/stats", get(dashboard::system_stats))
        .route("/dashboard/me", get(dashboard::my_dashboard));

    let app = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ]);

    if server.cors_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = server
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ReserveHubError::Config(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}
