//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod notification;
pub mod reservation;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthService, USER_ID_HEADER, require_role, require_owner_or_staff};
pub use notification::{NotificationService, MessageTemplate, FanOutReport};
pub use reservation::ReservationService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::{health_check, DatabaseService};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub auth_service: AuthService,
    pub notification_service: NotificationService,
    pub reservation_service: ReservationService,
    database: DatabaseService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: &Settings) -> Self {
        let user_service = UserService::new(database.users.clone());
        let auth_service = AuthService::new(database.users.clone());
        let notification_service = NotificationService::new(
            database.notifications.clone(),
            database.users.clone(),
            settings.reservations.clone(),
        );
        let reservation_service = ReservationService::new(
            database.reservations.clone(),
            database.events.clone(),
            notification_service.clone(),
            settings.reservations.clone(),
        );

        Self {
            user_service,
            auth_service,
            notification_service,
            reservation_service,
            database,
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = health_check(&self.database.pool).await.is_ok();

        ServiceHealthStatus { database_healthy }
    }
}

/// Health status for all services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }

        issues
    }
}
