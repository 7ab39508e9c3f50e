//! # Store API
//!
//! HTTP/JSON server for categories, customers, products, orders and reports.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store API Routes                                │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Catalog       │  │  Orders        │  │  Reports                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • /categories  │  │ • /orders      │  │ • customer-totals          ││
//! │  │ • /customers   │  │ • /orders/{id} │  │ • category-children        ││
//! │  │ • /products    │  │   /items  ◄────┼──┼── AddProductToOrder        ││
//! │  └────────────────┘  └────────────────┘  │ • top-products-last-month  ││
//! │                                          └────────────────────────────┘│
//! │  ┌────────────────┐  ┌────────────────┐                                 │
//! │  │  Health        │  │  Docs          │  Layers: request_context →     │
//! │  │ • /healthz     │  │ • /docs        │  request_timeout → catch panic │
//! │  │ • /readyz      │  │ • /swagger     │                                 │
//! │  └────────────────┘  └────────────────┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::StoreConfig`].

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;

use store_db::Database;

// Re-exports
pub use crate::config::StoreConfig;
pub use crate::error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<StoreConfig>,
}

impl AppState {
    pub fn new(db: Database, config: StoreConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the full router with middleware applied.
pub fn app(state: AppState) -> Router {
    with_layers(routes::router(), state)
}

/// Wraps `router` in the request stack: panic recovery innermost, then the
/// timeout, then request id and logging outermost.
pub fn with_layers(router: Router<AppState>, state: AppState) -> Router {
    router
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_timeout,
        ))
        .layer(axum::middleware::from_fn(middleware::request_context))
        .with_state(state)
}
