//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod category;
pub mod resource;
pub mod event;
pub mod reservation;
pub mod notification;
pub mod site_config;

// Re-export commonly used models
pub use user::{User, Role, CreateUserRequest, UpdateUserRequest, LoginRequest, RegisterRequest};
pub use category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
pub use resource::{Resource, ResourceStatus, ResourceFilter, CreateResourceRequest, UpdateResourceRequest};
pub use event::{Event, EventDetails, EventStatus, EventFilter, CreateEventRequest, UpdateEventRequest, AttachResourceRequest};
pub use reservation::{Reservation, ReservationStatus, ReservationFilter, NewReservation, CreateReservationRequest, UpdateReservationRequest, UpdateReservationStatusRequest};
pub use notification::{Notification, NotificationKind, CreateNotificationRequest};
pub use site_config::SiteConfigEntry;
