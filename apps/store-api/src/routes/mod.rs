//! HTTP routes, one module per resource.

pub mod categories;
pub mod customers;
pub mod docs;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use store_core::validation::{parse_page, parse_uuid};
use store_core::Page;

use crate::error::ApiResult;
use crate::AppState;

/// All routes, without middleware or state.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get).put(categories::update).delete(categories::delete),
        )
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::get).put(customers::update).delete(customers::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/{id}",
            get(orders::get).put(orders::update_status).delete(orders::delete),
        )
        .route("/orders/{id}/items", post(orders::add_item))
        .route("/reports/customer-totals", get(reports::customer_totals))
        .route("/reports/category-children", get(reports::category_children))
        .route("/reports/top-products-last-month", get(reports::top_products_last_month))
        .route("/docs", get(docs::index))
        .route("/docs/", get(docs::index))
        .route("/docs/openapi.yaml", get(docs::openapi_yaml))
        .route("/docs/openapi.json", get(docs::openapi_json))
        .route("/swagger", get(docs::swagger))
}

/// `?limit=&offset=` kept as raw strings so bad values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size, default 50, capped at 1000
    pub limit: Option<String>,
    /// Rows to skip, default 0
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        parse_page(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// Parses the `{id}` path segment.
pub(crate) fn path_id(raw: &str) -> ApiResult<Uuid> {
    Ok(parse_uuid("id", raw)?)
}
