//! Resource model

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    pub fn is_available(&self) -> bool {
        self.status == ResourceStatus::Available.as_str()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResourceRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<ResourceStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateResourceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<ResourceStatus>,
}

/// Query filters for listing resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceFilter {
    pub category_id: Option<i64>,
    pub status: Option<ResourceStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Available,
    Unavailable,
    Maintenance,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Available => "available",
            ResourceStatus::Unavailable => "unavailable",
            ResourceStatus::Maintenance => "maintenance",
        }
    }
}

impl FromStr for ResourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(ResourceStatus::Available),
            "unavailable" => Ok(ResourceStatus::Unavailable),
            "maintenance" => Ok(ResourceStatus::Maintenance),
            other => Err(format!("unknown resource status: {}", other)),
        }
    }
}
