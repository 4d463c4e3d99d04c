//! Site configuration repository implementation

use std::collections::BTreeMap;
use std::time::Instant;

use sqlx::PgPool;
use chrono::Utc;
use crate::models::site_config::SiteConfigEntry;
use crate::utils::errors::ReserveHubError;
use crate::utils::logging::log_database_operation;

#[derive(Clone)]
pub struct SiteConfigRepository {
    pool: PgPool,
}

impl SiteConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all settings
    pub async fn list(&self) -> Result<Vec<SiteConfigEntry>, ReserveHubError> {
        let entries = sqlx::query_as::<_, SiteConfigEntry>(
            "SELECT key, value, updated_by, updated_at FROM site_config ORDER BY key ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Insert or overwrite every key of `values` in one transaction
    pub async fn upsert_many(&self, values: &BTreeMap<String, String>, updated_by: i64) -> Result<Vec<SiteConfigEntry>, ReserveHubError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;
        let mut entries = Vec::with_capacity(values.len());

        for (key, value) in values {
            let entry = sqlx::query_as::<_, SiteConfigEntry>(
                r#"
                INSERT INTO site_config (key, value, updated_by, updated_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (key)
                DO UPDATE SET
                    value = EXCLUDED.value,
                    updated_by = EXCLUDED.updated_by,
                    updated_at = EXCLUDED.updated_at
                RETURNING key, value, updated_by, updated_at
                "#
            )
            .bind(key)
            .bind(value)
            .bind(updated_by)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;
            entries.push(entry);
        }

        tx.commit().await?;
        log_database_operation("upsert", "site_config", started.elapsed().as_millis() as u64, true);
        Ok(entries)
    }

    /// Delete a setting
    pub async fn delete(&self, key: &str) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM site_config WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
