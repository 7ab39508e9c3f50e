//! Order routes, including `POST /orders/{id}/items`.
//!
//! ## Adding an Item
//! ```text
//! POST /orders/{id}/items  {"product_id": "...", "quantity": 3}
//!      │
//!      ├─ bad id / bad JSON / quantity <= 0 ──────► 400 VALIDATION_ERROR
//!      │
//!      ▼
//! OrderRepository::add_product (one transaction)
//!      │
//!      ├─ NotFound ───────────────────────────────► 404 NOT_FOUND
//!      ├─ InsufficientStock ──────────────────────► 400 INSUFFICIENT_STOCK
//!      ├─ Storage ────────────────────────────────► 500 DATABASE_ERROR
//!      │
//!      ▼
//! 200 OrderItem (the line after the addition)
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use store_core::validation::{validate_quantity, validate_status};
use store_core::{Order, OrderInput, OrderItem};

use super::{path_id, PageQuery};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(PageQuery),
    responses((status = 200, description = "One page of orders", body = [Order]))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db.orders().list(query.page()).await?))
}

/// Creates an empty order. Unknown `customer_id` is a 400.
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    request_body = OrderInput,
    responses(
        (status = 201, description = "Created", body = Order),
        (status = 400, description = "Invalid body", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let Json(input) = payload?;
    let (customer_id, status) = input.validated()?;

    let order = state.db.orders().create(customer_id, &status).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Found", body = Order),
        (status = 404, description = "No such order", body = ErrorBody),
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    let id = path_id(&id)?;

    state
        .db
        .orders()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Order not found: {}", id)))
}

/// Changes the status label only; items and total are untouched.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated", body = Order),
        (status = 400, description = "Empty status", body = ErrorBody),
        (status = 404, description = "No such order", body = ErrorBody),
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    let id = path_id(&id)?;
    let Json(request) = payload?;
    let status = validate_status(&request.status)?;

    Ok(Json(state.db.orders().update_status(id, &status).await?))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such order", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = path_id(&id)?;
    state.db.orders().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/orders/{id}/items",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = AddItemRequest,
    responses(
        (status = 200, description = "The line after the addition", body = OrderItem),
        (status = 400, description = "Invalid body or insufficient stock", body = ErrorBody),
        (status = 404, description = "No such order or product", body = ErrorBody),
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> ApiResult<Json<OrderItem>> {
    let order_id = path_id(&id)?;
    let Json(request) = payload?;
    let quantity = validate_quantity(request.quantity)?;

    debug!(order_id = %order_id, product_id = %request.product_id, quantity, "Adding item");

    let item = state
        .db
        .orders()
        .add_product(order_id, request.product_id, quantity)
        .await?;

    Ok(Json(item))
}
