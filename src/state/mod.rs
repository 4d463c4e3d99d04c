//! Shared application state
//!
//! Handlers receive a clone of [`AppState`] per request; every field is
//! cheap to clone because repositories only hold the connection pool.

use std::sync::Arc;

use crate::config::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::services::ServiceFactory;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pool: DatabasePool, settings: Settings) -> Self {
        let db = DatabaseService::new(pool);
        let services = ServiceFactory::new(db.clone(), &settings);

        Self {
            db,
            services,
            settings: Arc::new(settings),
        }
    }
}
