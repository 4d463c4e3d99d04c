//! Site configuration handlers
//!
//! The configuration is exposed as a flat JSON object. Reading is public so
//! the frontend can brand its login page; writes are admin only.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use super::{ApiJson, ApiPath};
use crate::middleware::CurrentUser;
use crate::models::{Role, SiteConfigEntry};
use crate::state::AppState;
use crate::utils::errors::{ReserveHubError, Result};
use crate::utils::logging::log_admin_action;

/// Handle `GET /api/site-config`
pub async fn get_site_config(State(state): State<AppState>) -> Result<Json<BTreeMap<String, String>>> {
    let entries = state.db.site_config.list().await?;
    Ok(Json(entries_to_map(entries)))
}

/// Handle `PUT /api/site-config` (admin); every submitted key is upserted
pub async fn update_site_config(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiJson(body): ApiJson<BTreeMap<String, Value>>,
) -> Result<Json<BTreeMap<String, String>>> {
    let actor = current.require(Role::ADMIN_ONLY)?;
    let values = normalize_values(body)?;

    state.db.site_config.upsert_many(&values, actor.id).await?;
    let keys = values.keys().cloned().collect::<Vec<_>>().join(",");
    log_admin_action(actor.id, "update_site_config", Some(keys.as_str()), None);

    let entries = state.db.site_config.list().await?;
    Ok(Json(entries_to_map(entries)))
}

/// Handle `DELETE /api/site-config/{key}` (admin)
pub async fn delete_site_config_key(
    State(state): State<AppState>,
    current: CurrentUser,
    ApiPath(key): ApiPath<String>,
) -> Result<StatusCode> {
    let actor = current.require(Role::ADMIN_ONLY)?;
    if !state.db.site_config.delete(&key).await? {
        return Err(ReserveHubError::not_found("Setting", key));
    }

    log_admin_action(actor.id, "delete_site_config", Some(key.as_str()), None);
    Ok(StatusCode::NO_CONTENT)
}

fn entries_to_map(entries: Vec<SiteConfigEntry>) -> BTreeMap<String, String> {
    entries.into_iter().map(|entry| (entry.key, entry.value)).collect()
}

const MAX_KEY_LENGTH: usize = 100;

/// Strings are stored as-is, other JSON values as their JSON text
fn normalize_values(body: BTreeMap<String, Value>) -> Result<BTreeMap<String, String>> {
    body.into_iter()
        .map(|(key, value)| {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(ReserveHubError::InvalidInput("Setting keys cannot be empty".to_string()));
            }
            if key.chars().count() > MAX_KEY_LENGTH {
                return Err(ReserveHubError::InvalidInput(format!(
                    "Setting keys cannot be longer than {} characters",
                    MAX_KEY_LENGTH
                )));
            }
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            Ok((key, value))
        })
        .collect()
}
