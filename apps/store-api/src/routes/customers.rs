use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use store_core::{Customer, CustomerInput};

use super::{path_id, PageQuery};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    params(PageQuery),
    responses((status = 200, description = "One page of customers", body = [Customer]))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list(query.page()).await?))
}

#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = CustomerInput,
    responses(
        (status = 201, description = "Created", body = Customer),
        (status = 400, description = "Invalid body", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let Json(input) = payload?;
    let input = input.validated()?;

    let customer = state.db.customers().create(&input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Found", body = Customer),
        (status = 404, description = "No such customer", body = ErrorBody),
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    let id = path_id(&id)?;

    state
        .db
        .customers()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Customer not found: {}", id)))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "Updated", body = Customer),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such customer", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> ApiResult<Json<Customer>> {
    let id = path_id(&id)?;
    let Json(input) = payload?;
    let input = input.validated()?;

    Ok(Json(state.db.customers().update(id, &input).await?))
}

/// 409 while the customer still has orders.
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such customer", body = ErrorBody),
        (status = 409, description = "Customer still has orders", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = path_id(&id)?;
    state.db.customers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
