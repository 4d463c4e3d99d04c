//! Site configuration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteConfigEntry {
    pub key: String,
    pub value: String,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
