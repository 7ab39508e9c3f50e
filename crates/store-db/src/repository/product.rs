//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD operations
//! - Category links (`product_categories`), written in the same
//!   transaction as the product row
//!
//! ## Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Who Changes products.quantity                    │
//! │                                                                     │
//! │  PUT /products/{id}      → absolute value (restock, correction)     │
//! │                            this repository                          │
//! │                                                                     │
//! │  POST /orders/{id}/items → quantity = quantity - delta              │
//! │                            OrderRepository::add_product, under a    │
//! │                            row lock, after the stock check          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use store_core::validation::validate_price;
use store_core::{Page, Product, ProductCategory, ProductInput};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.create(&input).await?;
/// let same = repo.get_by_id(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        self.create_with_categories(input, &[]).await
    }

    /// Inserts a product and links it to `category_ids` in one transaction.
    ///
    /// An unknown category rolls the insert back.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the row as stored
    /// * `Err(DbError::ForeignKeyViolation)` - a category id does not exist
    pub async fn create_with_categories(
        &self,
        input: &ProductInput,
        category_ids: &[Uuid],
    ) -> DbResult<Product> {
        validate_price(input.price)?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        debug!(id = %id, name = %input.name, links = category_ids.len(), "Inserting product");

        let mut tx = self.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, name, price, quantity, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.quantity)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for &category_id in category_ids {
            link_category(&mut *tx, product.id, category_id).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(product)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists one page of products, newest first.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Updates name, price and stock of an existing product.
    ///
    /// Existing order lines keep the subtotal they were priced at.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the row as stored
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: Uuid, input: &ProductInput) -> DbResult<Product> {
        self.update_with_categories(id, input, &[]).await
    }

    /// Updates a product and adds links to `category_ids` in one transaction.
    ///
    /// Existing links are kept. An unknown category rolls the update back.
    pub async fn update_with_categories(
        &self,
        id: Uuid,
        input: &ProductInput,
        category_ids: &[Uuid],
    ) -> DbResult<Product> {
        validate_price(input.price)?;

        debug!(id = %id, links = category_ids.len(), "Updating product");

        let mut tx = self.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = $2,
                price = $3,
                quantity = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING id, name, price, quantity, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.quantity)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        for &category_id in category_ids {
            link_category(&mut *tx, product.id, category_id).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(product)
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::StillReferenced)` - the product is on an order line
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Links a product to a category. Linking twice is a no-op.
    pub async fn attach_category(
        &self,
        product_id: Uuid,
        category_id: Uuid,
    ) -> DbResult<ProductCategory> {
        link_category(&self.pool, product_id, category_id).await
    }

    /// Counts total products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

async fn link_category<'e, E>(
    executor: E,
    product_id: Uuid,
    category_id: Uuid,
) -> DbResult<ProductCategory>
where
    E: PgExecutor<'e>,
{
    debug!(product_id = %product_id, category_id = %category_id, "Linking product to category");

    let link = sqlx::query_as::<_, ProductCategory>(
        r#"
        INSERT INTO product_categories (product_id, category_id, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        ON CONFLICT (product_id, category_id)
            DO UPDATE SET updated_at = EXCLUDED.updated_at
        RETURNING product_id, category_id, created_at
        "#,
    )
    .bind(product_id)
    .bind(category_id)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(link)
}
