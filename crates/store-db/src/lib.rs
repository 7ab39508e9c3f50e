//! # store-db: Database Layer for the Store Service
//!
//! PostgreSQL access for the store service via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Service Data Flow                          │
//! │                                                                         │
//! │  axum handler (POST /orders/{id}/items)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     store-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CategoryRepo  │    │              │  │   │
//! │  │   │ PgPool        │◄───│ CustomerRepo  │    │ 001_initial  │  │   │
//! │  │   │               │    │ ProductRepo   │    │   _schema    │  │   │
//! │  │   │               │    │ OrderRepo     │    │              │  │   │
//! │  │   │               │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     PostgreSQL                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use store_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("postgres://localhost/store")).await?;
//!
//! let item = db.orders().add_product(order_id, product_id, 3).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
