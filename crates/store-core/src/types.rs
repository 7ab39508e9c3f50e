//! # Domain Types
//!
//! Entities, write inputs and report rows used throughout the store service.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Customer     │ 1    * │      Order      │ 1    *  ┌───────────┐ │
//! │  │  id, name,      │───────►│  total_price    │────────►│ OrderItem │ │
//! │  │  email, phone   │        │  status         │ (owns)  │ quantity  │ │
//! │  └─────────────────┘        └─────────────────┘         │ sub_total │ │
//! │                                                          └─────┬─────┘ │
//! │  ┌─────────────────┐  *   * ┌─────────────────┐  1           *│       │
//! │  │    Category     │◄──────►│     Product     │◄──────────────┘       │
//! │  │  parent_id ─┐   │        │  price, quantity│  (referenced)         │
//! │  └─────────────┼───┘        └─────────────────┘                        │
//! │                └── self-reference (tree)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All ids are UUID v4. Timestamps are UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{
    validate_level, validate_name, validate_price, validate_slug, validate_status, validate_stock,
    ValidationResult,
};
use crate::DEFAULT_ORDER_STATUS;

// =============================================================================
// Category
// =============================================================================

/// A node in the category tree.
///
/// Roots have no `parent_id`; the top-products report groups by root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique key
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub level: i32,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body for a category.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub level: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl CategoryInput {
    /// Trims and checks every field.
    pub fn validated(self) -> ValidationResult<Self> {
        validate_level(self.level)?;
        Ok(CategoryInput {
            name: validate_name("name", &self.name, 200)?,
            slug: validate_slug(&self.slug)?,
            ..self
        })
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update body for a customer. Contact fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CustomerInput {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl CustomerInput {
    pub fn validated(self) -> ValidationResult<Self> {
        Ok(CustomerInput {
            name: validate_name("name", &self.name, 200)?,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product.
///
/// `quantity` is stock on hand and never drops below zero in any
/// committed state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Money,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductInput {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub quantity: i32,
}

impl ProductInput {
    pub fn validated(self) -> ValidationResult<Self> {
        validate_stock(self.quantity)?;
        Ok(ProductInput {
            name: validate_name("name", &self.name, 200)?,
            price: validate_price(self.price)?,
            quantity: self.quantity,
        })
    }
}

/// Link between a product and a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductCategory {
    pub product_id: Uuid,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// A customer order with its line items.
///
/// ## Invariant
/// `total_price` equals the sum of `items[].sub_total`.
/// Only the AddProductToOrder transaction changes either side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub total_price: Money,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One product's quantity and subtotal inside an order.
///
/// At most one row exists per `(order_id, product_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub sub_total: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create body for an order. Status defaults to `"new"`.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OrderInput {
    pub customer_id: Uuid,
    #[serde(default)]
    pub status: Option<String>,
}

impl OrderInput {
    /// Returns the customer id and the status to store.
    pub fn validated(self) -> ValidationResult<(Uuid, String)> {
        let status = match self.status.as_deref() {
            None => DEFAULT_ORDER_STATUS.to_string(),
            Some(s) if s.trim().is_empty() => DEFAULT_ORDER_STATUS.to_string(),
            Some(s) => validate_status(s)?,
        };
        Ok((self.customer_id, status))
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Sum of line subtotals across all of a customer's orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CustomerTotal {
    pub customer_name: String,
    pub total_amount: Money,
}

/// Number of immediate children of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryChildren {
    pub category_id: Uuid,
    pub name: String,
    pub children_count: i64,
}

/// A best seller of the previous calendar month.
///
/// `category_level_1` is the root category name, or `None` when the
/// product has no category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TopProduct {
    pub product_name: String,
    pub category_level_1: Option<String>,
    pub total_quantity: i64,
}

// =============================================================================
// Pagination
// =============================================================================

/// A `LIMIT` / `OFFSET` window. Build one with
/// [`parse_page`](crate::validation::parse_page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: crate::DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_input_defaults() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name": " Drinks ", "slug": "drinks"}"#).unwrap();
        let input = input.validated().unwrap();

        assert_eq!(input.name, "Drinks");
        assert!(input.is_active);
        assert_eq!(input.level, 0);
        assert_eq!(input.parent_id, None);
    }

    #[test]
    fn test_product_input_accepts_string_price() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name": "Tea", "price": "2.5", "quantity": 10}"#).unwrap();
        let input = input.validated().unwrap();

        assert_eq!(input.price.to_string(), "2.50");
        assert_eq!(input.quantity, 10);
    }

    #[test]
    fn test_product_input_rejects_negative_stock() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name": "Tea", "price": "1.00", "quantity": -1}"#).unwrap();
        assert!(input.validated().is_err());
    }

    #[test]
    fn test_order_input_default_status() {
        let input: OrderInput = serde_json::from_str(
            r#"{"customer_id": "550e8400-e29b-41d4-a716-446655440000"}"#,
        )
        .unwrap();
        let (_, status) = input.validated().unwrap();
        assert_eq!(status, "new");
    }

    #[test]
    fn test_page_default() {
        let page = Page::default();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }
}
