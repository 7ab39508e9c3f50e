use axum::extract::State;
use axum::Json;

use store_core::{CategoryChildren, CustomerTotal, TopProduct};

use crate::error::ApiResult;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/reports/customer-totals",
    tag = "reports",
    responses((status = 200, description = "Order totals per customer", body = [CustomerTotal]))
)]
pub async fn customer_totals(State(state): State<AppState>) -> ApiResult<Json<Vec<CustomerTotal>>> {
    Ok(Json(state.db.reports().customer_totals().await?))
}

#[utoipa::path(
    get,
    path = "/reports/category-children",
    tag = "reports",
    responses((status = 200, description = "Direct child count per category", body = [CategoryChildren]))
)]
pub async fn category_children(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategoryChildren>>> {
    Ok(Json(state.db.reports().category_children().await?))
}

/// Previous calendar month relative to the server clock, UTC.
#[utoipa::path(
    get,
    path = "/reports/top-products-last-month",
    tag = "reports",
    responses((status = 200, description = "Five best sellers of the previous month", body = [TopProduct]))
)]
pub async fn top_products_last_month(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TopProduct>>> {
    Ok(Json(state.db.reports().top_products_last_month().await?))
}
