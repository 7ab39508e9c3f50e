//! # Order Repository
//!
//! Orders, their line items, and the AddProductToOrder transaction.
//!
//! ## AddProductToOrder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   add_product(order, product, qty)                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├─ 1. SELECT total_price FROM orders ... FOR UPDATE ─► NotFound?      │
//! │   ├─ 2. SELECT price, quantity FROM products ... FOR UPDATE             │
//! │   │                                                   ─► NotFound?      │
//! │   ├─ 3. SELECT ... FROM order_items                                     │
//! │   │        WHERE order_id AND product_id FOR UPDATE   (may be absent)   │
//! │   │                                                                     │
//! │   ├─ plan_addition (store-core)                       ─► Insufficient?  │
//! │   │                                                                     │
//! │   ├─ 4. UPDATE order_items / INSERT order_items                         │
//! │   ├─ 5. UPDATE orders   SET total_price = total_price + delta           │
//! │   └─ 6. UPDATE products SET quantity    = quantity - qty                │
//! │                                                                         │
//! │  COMMIT   (any early return drops the transaction → ROLLBACK)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locks are always taken order → product → line item. Two requests that
//! touch the same order serialize on step 1; two requests for different
//! orders but the same product serialize on step 2. A fixed order means
//! they never wait on each other in a cycle.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use store_core::validation::validate_quantity;
use store_core::{
    next_order_total, plan_addition, CoreResult, ExistingLine, LockedProduct, Money, Order,
    OrderItem, Page,
};

/// Repository for order and order-item database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: PgPool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Order CRUD
    // =========================================================================

    /// Creates an empty order (total 0, no items).
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - customer does not exist
    pub async fn create(&self, customer_id: Uuid, status: &str) -> DbResult<Order> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        debug!(id = %id, customer_id = %customer_id, "Creating order");

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, customer_id, status, total_price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, customer_id, status, total_price, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(status)
        .bind(Money::zero())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order with its line items.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, status, total_price, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.items = self.items(id).await?;
        Ok(Some(order))
    }

    /// Lists one page of orders, newest first, each with its items.
    ///
    /// Items for the whole page are loaded with a single `= ANY($1)` query.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Order>> {
        let mut orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, status, total_price, created_at, updated_at
            FROM orders
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, sub_total, created_at, updated_at
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        for order in &mut orders {
            order.items = by_order.remove(&order.id).unwrap_or_default();
        }

        Ok(orders)
    }

    /// Line items of one order, oldest first.
    pub async fn items(&self, order_id: Uuid) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, sub_total, created_at, updated_at
            FROM order_items
            WHERE order_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Changes the status label of an order and returns the full order.
    pub async fn update_status(&self, id: Uuid, status: &str) -> DbResult<Order> {
        debug!(id = %id, status = %status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Deletes an order and, by cascade, its line items.
    ///
    /// Stock is not returned to products.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(id = %id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    // =========================================================================
    // AddProductToOrder
    // =========================================================================

    /// Adds `quantity` units of a product to an order.
    ///
    /// Creates the line on first addition and increments it afterwards.
    /// Order total, line and stock change together or not at all.
    ///
    /// ## Errors
    /// Exactly one of the four `CoreError` kinds:
    /// * `NotFound` - order or product does not exist
    /// * `InsufficientStock` - stock < quantity
    /// * `Validation` - quantity <= 0, or the line quantity would overflow
    /// * `Storage` - anything else; detail is for logs only
    ///
    /// ## Example
    /// ```rust,ignore
    /// let item = db.orders().add_product(order_id, product_id, 3).await?;
    /// assert_eq!(item.quantity, 3);
    /// ```
    pub async fn add_product(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> CoreResult<OrderItem> {
        Ok(self.add_product_tx(order_id, product_id, quantity).await?)
    }

    async fn add_product_tx(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> DbResult<OrderItem> {
        validate_quantity(i64::from(quantity))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // 1. Order row
        let current_total: Money =
            sqlx::query_scalar("SELECT total_price FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Order", order_id))?;

        // 2. Product row
        let (price, stock): (Money, i32) =
            sqlx::query_as("SELECT price, quantity FROM products WHERE id = $1 FOR UPDATE")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Product", product_id))?;

        // 3. Existing line, if any
        let existing = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, sub_total, created_at, updated_at
            FROM order_items
            WHERE order_id = $1 AND product_id = $2
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let plan = plan_addition(
            LockedProduct {
                id: product_id,
                price,
                stock,
            },
            existing.as_ref().map(|line| ExistingLine {
                quantity: line.quantity,
                sub_total: line.sub_total,
            }),
            quantity,
        )?;
        next_order_total(current_total, plan.total_delta)?;

        let now = Utc::now();

        // 4. Line item
        let item = match existing {
            Some(line) => {
                sqlx::query_as::<_, OrderItem>(
                    r#"
                    UPDATE order_items
                    SET quantity = $2, sub_total = $3, updated_at = $4
                    WHERE id = $1
                    RETURNING id, order_id, product_id, quantity, sub_total, created_at, updated_at
                    "#,
                )
                .bind(line.id)
                .bind(plan.quantity)
                .bind(plan.sub_total)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderItem>(
                    r#"
                    INSERT INTO order_items (
                        id, order_id, product_id, quantity, sub_total, created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $6)
                    RETURNING id, order_id, product_id, quantity, sub_total, created_at, updated_at
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(order_id)
                .bind(product_id)
                .bind(plan.quantity)
                .bind(plan.sub_total)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        // 5. Order total
        sqlx::query("UPDATE orders SET total_price = total_price + $2, updated_at = $3 WHERE id = $1")
            .bind(order_id)
            .bind(plan.total_delta)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        // 6. Stock
        sqlx::query("UPDATE products SET quantity = quantity - $2, updated_at = $3 WHERE id = $1")
            .bind(product_id)
            .bind(quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = %order_id,
            product_id = %product_id,
            added = quantity,
            line_quantity = plan.quantity,
            total_delta = %plan.total_delta,
            stock_after = plan.stock_after,
            "Product added to order"
        );

        Ok(item)
    }
}
