//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod category;
pub mod resource;
pub mod event;
pub mod reservation;
pub mod notification;
pub mod site_config;

// Re-export repositories
pub use user::UserRepository;
pub use category::CategoryRepository;
pub use resource::ResourceRepository;
pub use event::EventRepository;
pub use reservation::ReservationRepository;
pub use notification::NotificationRepository;
pub use site_config::SiteConfigRepository;
