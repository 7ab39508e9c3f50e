use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use store_core::{Category, CategoryInput};

use super::{path_id, PageQuery};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(PageQuery),
    responses((status = 200, description = "One page of categories", body = [Category]))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list(query.page()).await?))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 400, description = "Invalid body", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    let input = input.validated()?;

    let category = state.db.categories().create(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Found", body = Category),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    let id = path_id(&id)?;

    state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", id)))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let id = path_id(&id)?;
    let Json(input) = payload?;
    let input = input.validated()?;

    Ok(Json(state.db.categories().update(id, &input).await?))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such category", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = path_id(&id)?;
    state.db.categories().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
