//! Notification service implementation
//!
//! This service formats notification texts from templates and stores them
//! for their recipients, one row per user.

use std::collections::HashMap;
use tracing::{debug, info, warn};
use crate::config::ReservationConfig;
use crate::database::repositories::{NotificationRepository, UserRepository};
use crate::models::{Notification, NotificationKind, CreateNotificationRequest, Reservation, Resource, Role, User};
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::helpers::{format_timestamp, truncate_text};

/// Length limit of the notifications.title column
const MAX_TITLE_LENGTH: usize = 255;

/// Title and body of a notification, with `{placeholder}` parameters
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub title: &'static str,
    pub body: &'static str,
}

/// Outcome of a fan-out
#[derive(Debug, Default)]
pub struct FanOutReport {
    pub delivered: Vec<Notification>,
    pub failed: Vec<(i64, ReserveHubError)>,
}

/// Notification service for reservation lifecycle messages
#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
    users: UserRepository,
    config: ReservationConfig,
    templates: HashMap<&'static str, MessageTemplate>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(notifications: NotificationRepository, users: UserRepository, config: ReservationConfig) -> Self {
        Self {
            notifications,
            users,
            config,
            templates: Self::load_default_templates(),
        }
    }

    /// Store one notification for a user
    pub async fn notify(&self, user_id: i64, kind: NotificationKind, parameters: &HashMap<&str, String>) -> Result<Notification> {
        let (title, message) = self.format_message(kind, parameters)?;
        debug!(user_id = user_id, kind = kind.as_str(), "Creating notification");

        self.notifications.create(CreateNotificationRequest {
            user_id,
            title: truncate_text(&title, MAX_TITLE_LENGTH),
            message,
            kind,
        }).await
    }

    /// Store the same notification for several users; individual failures are collected
    pub async fn notify_many(&self, user_ids: &[i64], kind: NotificationKind, parameters: &HashMap<&str, String>) -> FanOutReport {
        let mut report = FanOutReport::default();

        for &user_id in user_ids {
            match self.notify(user_id, kind, parameters).await {
                Ok(notification) => report.delivered.push(notification),
                Err(e) => {
                    warn!(user_id = user_id, kind = kind.as_str(), error = %e, "Failed to create notification");
                    report.failed.push((user_id, e));
                }
            }
        }

        info!(
            kind = kind.as_str(),
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Notifications fanned out"
        );
        report
    }

    /// Tell every manager and the requester about a new reservation
    pub async fn reservation_requested(&self, reservation: &Reservation, resource: &Resource, requester: &User) -> Result<FanOutReport> {
        let mut recipients = Vec::new();
        if self.config.notify_managers {
            recipients.extend(self.users.list_by_role(Role::Manager).await?.into_iter().map(|u| u.id));
        }
        let recipients = recipient_ids(recipients, requester.id);

        let mut parameters = reservation_parameters(reservation, resource);
        parameters.insert("requester", requester.full_name());

        Ok(self.notify_many(&recipients, NotificationKind::ReservationRequested, &parameters).await)
    }

    /// Tell the requester that their reservation changed status
    pub async fn reservation_status_changed(&self, reservation: &Reservation, resource: &Resource, kind: NotificationKind) -> Result<Notification> {
        let parameters = reservation_parameters(reservation, resource);
        self.notify(reservation.user_id, kind, &parameters).await
    }

    /// Format message using template and parameters
    fn format_message(&self, kind: NotificationKind, parameters: &HashMap<&str, String>) -> Result<(String, String)> {
        let template = self.templates.get(kind.as_str())
            .ok_or_else(|| ReserveHubError::InvalidInput(format!("Template not found: {}", kind.as_str())))?;

        Ok((fill(template.title, parameters), fill(template.body, parameters)))
    }

    /// Load default message templates
    fn load_default_templates() -> HashMap<&'static str, MessageTemplate> {
        let mut templates = HashMap::new();

        templates.insert(NotificationKind::ReservationRequested.as_str(), MessageTemplate {
            title: "New reservation request",
            body: "{requester} requested {resource_name} from {start_time} to {end_time}.",
        });

        templates.insert(NotificationKind::ReservationConfirmed.as_str(), MessageTemplate {
            title: "Reservation confirmed",
            body: "Your reservation of {resource_name} from {start_time} to {end_time} is confirmed.",
        });

        templates.insert(NotificationKind::ReservationRejected.as_str(), MessageTemplate {
            title: "Reservation rejected",
            body: "Your reservation of {resource_name} from {start_time} to {end_time} was rejected.",
        });

        templates.insert(NotificationKind::ReservationCancelled.as_str(), MessageTemplate {
            title: "Reservation cancelled",
            body: "The reservation of {resource_name} from {start_time} to {end_time} was cancelled.",
        });

        templates
    }
}

/// Managers plus the requester, each once, in a stable order
pub fn recipient_ids(mut managers: Vec<i64>, requester_id: i64) -> Vec<i64> {
    managers.push(requester_id);
    managers.sort_unstable();
    managers.dedup();
    managers
}

fn reservation_parameters(reservation: &Reservation, resource: &Resource) -> HashMap<&'static str, String> {
    let mut parameters = HashMap::new();
    parameters.insert("resource_name", resource.name.clone());
    parameters.insert("start_time", format_timestamp(reservation.start_time));
    parameters.insert("end_time", format_timestamp(reservation.end_time));
    parameters.insert("reservation_id", reservation.id.to_string());
    parameters
}

fn fill(template: &str, parameters: &HashMap<&str, String>) -> String {
    let mut formatted = template.to_string();

    // Replace parameters in the template
    for (key, value) in parameters {
        let placeholder = format!("{{{}}}", key);
        formatted = formatted.replace(&placeholder, value);
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_placeholders() {
        let mut parameters = HashMap::new();
        parameters.insert("resource_name", "Room A".to_string());
        parameters.insert("start_time", "2024-06-01 10:00 UTC".to_string());

        let text = fill("Booked {resource_name} at {start_time} ({unknown})", &parameters);
        assert_eq!(text, "Booked Room A at 2024-06-01 10:00 UTC ({unknown})");
    }

    #[test]
    fn test_every_kind_has_a_template() {
        let templates = NotificationService::load_default_templates();
        for kind in [
            NotificationKind::ReservationRequested,
            NotificationKind::ReservationConfirmed,
            NotificationKind::ReservationRejected,
            NotificationKind::ReservationCancelled,
        ] {
            assert!(templates.contains_key(kind.as_str()), "missing template for {}", kind.as_str());
        }
    }

    #[test]
    fn test_recipient_ids_include_requester_once() {
        assert_eq!(recipient_ids(vec![5, 2], 9), vec![2, 5, 9]);
        assert_eq!(recipient_ids(vec![5, 2], 5), vec![2, 5]);
        assert_eq!(recipient_ids(vec![], 3), vec![3]);
    }
}
