//! Category repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::utils::errors::ReserveHubError;

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, ReserveHubError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Category"))?;

        Ok(category)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, ReserveHubError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list(&self) -> Result<Vec<Category>, ReserveHubError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn update(&self, id: i64, request: UpdateCategoryRequest) -> Result<Category, ReserveHubError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#
        )
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ReserveHubError::from_db_unique(e, "Category"))?;

        category.ok_or_else(|| ReserveHubError::not_found("Category", id))
    }

    /// Delete category; resources keep existing with no category
    pub async fn delete(&self, id: i64) -> Result<bool, ReserveHubError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
