//! # Category Repository
//!
//! CRUD for the category tree. Lists come back ordered by
//! `sort_order ASC, created_at DESC` so siblings keep their configured order.

use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use store_core::{Category, CategoryInput, Page, ValidationError};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: PgPool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - slug already taken
    /// * `Err(DbError::ForeignKeyViolation)` - parent_id does not exist
    pub async fn create(&self, input: &CategoryInput) -> DbResult<Category> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        debug!(id = %id, slug = %input.slug, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (
                id, name, slug, parent_id, level, is_active, sort_order,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, name, slug, parent_id, level, is_active, sort_order,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.parent_id)
        .bind(input.level)
        .bind(input.is_active)
        .bind(input.sort_order)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, parent_id, level, is_active, sort_order,
                   created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists one page of categories.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, parent_id, level, is_active, sort_order,
                   created_at, updated_at
            FROM categories
            ORDER BY sort_order ASC, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Replaces every editable field of a category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - the row as stored
    /// * `Err(DbError::NotFound)` - no category with this id
    /// * `Err(DbError::Validation)` - category would be its own parent
    pub async fn update(&self, id: Uuid, input: &CategoryInput) -> DbResult<Category> {
        if input.parent_id == Some(id) {
            return Err(ValidationError::InvalidFormat {
                field: "parent_id".to_string(),
                reason: "a category cannot be its own parent".to_string(),
            }
            .into());
        }

        debug!(id = %id, "Updating category");

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name = $2,
                slug = $3,
                parent_id = $4,
                level = $5,
                is_active = $6,
                sort_order = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING id, name, slug, parent_id, level, is_active, sort_order,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.parent_id)
        .bind(input.level)
        .bind(input.is_active)
        .bind(input.sort_order)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category. Children are detached (parent_id set to NULL).
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}
