//! Database service layer
//!
//! This module provides a high-level interface to database operations

use std::collections::BTreeMap;

use crate::config::BootstrapAdminConfig;
use crate::database::{
    DatabasePool, UserRepository, CategoryRepository, ResourceRepository, EventRepository,
    ReservationRepository, NotificationRepository, SiteConfigRepository,
};
use crate::models::*;
use crate::utils::errors::ReserveHubError;
use crate::utils::helpers::normalize_email;

#[derive(Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub users: UserRepository,
    pub categories: CategoryRepository,
    pub resources: ResourceRepository,
    pub events: EventRepository,
    pub reservations: ReservationRepository,
    pub notifications: NotificationRepository,
    pub site_config: SiteConfigRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            resources: ResourceRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            site_config: SiteConfigRepository::new(pool.clone()),
            pool,
        }
    }

    /// Make sure the configured administrator exists
    pub async fn ensure_admin(&self, admin: &BootstrapAdminConfig) -> Result<User, ReserveHubError> {
        let email = normalize_email(&admin.email);

        // Check if user already exists
        if let Some(existing_user) = self.users.find_by_email(&email).await? {
            return Ok(existing_user);
        }

        let request = CreateUserRequest {
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            email,
            password: admin.password.clone(),
            role: Some(Role::Admin),
            phone: None,
        };

        self.users.create(request).await
    }

    /// Event with its linked resources
    pub async fn get_event_details(&self, event_id: i64) -> Result<EventDetails, ReserveHubError> {
        let event = self.events.find_by_id(event_id).await?
            .ok_or_else(|| ReserveHubError::not_found("Event", event_id))?;
        let resources = self.events.get_resources(event_id).await?;

        Ok(EventDetails { event, resources })
    }

    /// Get user's dashboard data
    pub async fn get_user_dashboard(&self, user_id: i64) -> Result<serde_json::Value, ReserveHubError> {
        let reservations = counts_to_map(self.reservations.count_by_status(Some(user_id)).await?);
        let unread_notifications = self.notifications.count_unread(user_id).await?;

        let dashboard = serde_json::json!({
            "reservations": reservations,
            "unread_notifications": unread_notifications
        });

        Ok(dashboard)
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, ReserveHubError> {
        let users = counts_to_map(self.users.count_by_role().await?);
        let resources = counts_to_map(self.resources.count_by_status().await?);
        let reservations = counts_to_map(self.reservations.count_by_status(None).await?);
        let total_events = self.events.count().await?;
        let upcoming_events = self.events.count_upcoming().await?;

        let stats = serde_json::json!({
            "users": users,
            "resources": resources,
            "reservations": reservations,
            "events": {
                "total": total_events,
                "upcoming": upcoming_events
            }
        });

        Ok(stats)
    }
}

/// Turn `(label, count)` rows into a JSON-friendly map with a total
pub fn counts_to_map(rows: Vec<(String, i64)>) -> BTreeMap<String, i64> {
    let total: i64 = rows.iter().map(|(_, count)| count).sum();
    let mut map: BTreeMap<String, i64> = rows.into_iter().collect();
    map.insert("total".to_string(), total);
    map
}
