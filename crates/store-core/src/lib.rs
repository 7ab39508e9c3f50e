//! # store-core: Pure Domain Logic for the Store Service
//!
//! Types and rules shared by the database layer and the HTTP API.
//! Nothing in here touches a socket, a file, or a database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Service Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    store-api (axum)                             │   │
//! │  │    /categories  /customers  /products  /orders  /reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ store-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ LinePlan  │  │   rules   │  │   │
//! │  │   │   Order   │  │ (Decimal) │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    store-db (PostgreSQL)                        │   │
//! │  │        repositories, migrations, row-locking transactions       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Category, Customer, Product, Order, OrderItem) and report rows
//! - [`money`] - Exact decimal money
//! - [`order`] - Line-item planning for adding a product to an order
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use store_core::money::Money;
//! use store_core::order::{plan_addition, LockedProduct};
//! use uuid::Uuid;
//!
//! let product = LockedProduct { id: Uuid::new_v4(), price: "2.00".parse().unwrap(), stock: 10 };
//! let plan = plan_addition(product, None, 3).unwrap();
//!
//! assert_eq!(plan.quantity, 3);
//! assert_eq!(plan.sub_total.to_string(), "6.00");
//! assert_eq!(plan.stock_after, 7);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{next_order_total, plan_addition, ExistingLine, LinePlan, LockedProduct};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Status given to an order created without one.
pub const DEFAULT_ORDER_STATUS: &str = "new";

/// Page size used when a list request carries no usable `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Upper bound on `limit` for list requests.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Number of rows returned by the top-products report.
pub const TOP_PRODUCTS_LIMIT: i64 = 5;
