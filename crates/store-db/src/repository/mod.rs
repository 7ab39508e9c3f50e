//! # Repository Module
//!
//! Database repository implementations for the store service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.orders().add_product(order_id, product_id, 3)        │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create / get_by_id / list / update_status / delete                │
//! │  └── add_product  (BEGIN … FOR UPDATE … COMMIT)                        │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category tree CRUD
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and category links
//! - [`OrderRepository`](order::OrderRepository) - Orders, line items, AddProductToOrder
//! - [`ReportRepository`](report::ReportRepository) - Read-only aggregates

pub mod category;
pub mod customer;
pub mod order;
pub mod product;
pub mod report;
