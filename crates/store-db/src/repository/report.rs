//! # Report Repository
//!
//! Read-only aggregate queries.
//!
//! ## Reports
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customer_totals          customers ⟕ orders ⟕ order_items              │
//! │                           SUM(sub_total) per customer, 0 if none        │
//! │                                                                         │
//! │  category_children        categories ⟕ categories (parent_id)           │
//! │                           COUNT(children) per category                  │
//! │                                                                         │
//! │  top_products_last_month  WITH RECURSIVE cat_path (roots → leaves)      │
//! │                           SUM(quantity) per (product, root category)    │
//! │                           orders created in the previous calendar month │
//! │                           top 5                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbResult;
use store_core::{CategoryChildren, CustomerTotal, TopProduct, TOP_PRODUCTS_LIMIT};

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        ReportRepository { pool }
    }

    /// Every customer with the sum of all their line subtotals, by name.
    pub async fn customer_totals(&self) -> DbResult<Vec<CustomerTotal>> {
        let rows = sqlx::query_as::<_, CustomerTotal>(
            r#"
            SELECT
                c.name AS customer_name,
                COALESCE(SUM(oi.sub_total), 0)::NUMERIC(20, 2) AS total_amount
            FROM customers c
            LEFT JOIN orders o ON o.customer_id = c.id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Every category with the number of its immediate children, by name.
    pub async fn category_children(&self) -> DbResult<Vec<CategoryChildren>> {
        let rows = sqlx::query_as::<_, CategoryChildren>(
            r#"
            SELECT
                c.id AS category_id,
                c.name,
                COUNT(child.id) AS children_count
            FROM categories c
            LEFT JOIN categories child ON child.parent_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Top sellers of the calendar month before the current one.
    pub async fn top_products_last_month(&self) -> DbResult<Vec<TopProduct>> {
        self.top_products_month_before(Utc::now()).await
    }

    /// Top sellers of the calendar month before the month containing `now`.
    ///
    /// Products are grouped with their root category; a product without a
    /// category is reported with `category_level_1 = None`.
    pub async fn top_products_month_before(&self, now: DateTime<Utc>) -> DbResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            WITH RECURSIVE cat_path AS (
                SELECT id, name AS root_name
                FROM categories
                WHERE parent_id IS NULL
                UNION ALL
                SELECT c.id, cp.root_name
                FROM categories c
                JOIN cat_path cp ON c.parent_id = cp.id
            )
            SELECT
                p.name AS product_name,
                cp.root_name AS category_level_1,
                SUM(oi.quantity)::BIGINT AS total_quantity
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            LEFT JOIN product_categories pc ON pc.product_id = p.id
            LEFT JOIN cat_path cp ON cp.id = pc.category_id
            WHERE o.created_at >= date_trunc('month', $1::timestamptz) - INTERVAL '1 month'
              AND o.created_at < date_trunc('month', $1::timestamptz)
            GROUP BY p.name, cp.root_name
            ORDER BY total_quantity DESC, p.name ASC
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(TOP_PRODUCTS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
