//! API documentation: Swagger UI at `/docs` over the generated document.
//!
//! ```text
//! GET /docs               → Swagger UI page (assets from unpkg)
//! GET /docs/openapi.yaml  → OpenAPI 3.1 document, YAML
//! GET /docs/openapi.json  → same document, JSON
//! GET /swagger            → 307 to /docs
//! ```

use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use tracing::error;
use utoipa::OpenApi;

use super::{categories, customers, health, orders, products, reports};
use crate::error::{ApiError, ApiResult, ErrorBody};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Service API",
        description = "Categories, customers, products, orders and sales reports."
    ),
    paths(
        health::healthz,
        health::readyz,
        categories::list,
        categories::create,
        categories::get,
        categories::update,
        categories::delete,
        customers::list,
        customers::create,
        customers::get,
        customers::update,
        customers::delete,
        products::list,
        products::create,
        products::get,
        products::update,
        products::delete,
        orders::list,
        orders::create,
        orders::get,
        orders::update_status,
        orders::delete,
        orders::add_item,
        reports::customer_totals,
        reports::category_children,
        reports::top_products_last_month,
    ),
    components(schemas(ErrorBody)),
    tags(
        (name = "orders", description = "Orders and AddProductToOrder"),
        (name = "reports", description = "Read-only sales reports"),
    )
)]
pub struct ApiDoc;

const SWAGGER_INDEX: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Store Service API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({
        url: '/docs/openapi.yaml',
        dom_id: '#swagger-ui',
        presets: [SwaggerUIBundle.presets.apis],
        layout: "BaseLayout"
      });
    };
  </script>
</body>
</html>"#;

pub async fn index() -> Html<&'static str> {
    Html(SWAGGER_INDEX)
}

pub async fn openapi_yaml() -> ApiResult<impl IntoResponse> {
    let yaml = ApiDoc::openapi().to_yaml().map_err(|e| {
        error!(error = %e, "Failed to render OpenAPI document");
        ApiError::internal()
    })?;

    Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml))
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn swagger() -> Redirect {
    Redirect::temporary("/docs")
}
