use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use store_core::{Product, ProductInput};

use super::{path_id, PageQuery};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::AppState;

/// Product body with optional category links, written with the product row.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[serde(flatten)]
    pub product: ProductInput,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(PageQuery),
    responses((status = 200, description = "One page of products", body = [Product]))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list(query.page()).await?))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Created", body = Product),
        (status = 400, description = "Invalid body", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(request) = payload?;
    let input = request.product.validated()?;

    let product = state
        .db
        .products()
        .create_with_categories(&input, &request.category_ids)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Found", body = Product),
        (status = 404, description = "No such product", body = ErrorBody),
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = path_id(&id)?;

    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Product not found: {}", id)))
}

/// Replaces name, price and stock. Listed `category_ids` are linked; existing
/// links are kept.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated", body = Product),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = path_id(&id)?;
    let Json(request) = payload?;
    let input = request.product.validated()?;

    let product = state
        .db
        .products()
        .update_with_categories(id, &input, &request.category_ids)
        .await?;

    Ok(Json(product))
}

/// 409 while the product is on an order line.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such product", body = ErrorBody),
        (status = 409, description = "Product is on an order line", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = path_id(&id)?;
    state.db.products().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
