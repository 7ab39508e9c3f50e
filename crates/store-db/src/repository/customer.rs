//! # Customer Repository
//!
//! Plain CRUD. A customer with orders cannot be deleted
//! (`DbError::StillReferenced`).

use chrono::Utc;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use store_core::{Customer, CustomerInput, Page};

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        CustomerRepository { pool }
    }

    pub async fn create(&self, input: &CustomerInput) -> DbResult<Customer> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        debug!(id = %id, "Inserting customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, name, email, phone, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists one page of customers, newest first.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM customers
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn update(&self, id: Uuid, input: &CustomerInput) -> DbResult<Customer> {
        debug!(id = %id, "Updating customer");

        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = $2,
                email = $3,
                phone = $4,
                address = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", id))
    }

    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}
