use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::warn;

use crate::AppState;

/// Liveness. Never touches the database.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Alive", body = String, content_type = "text/plain"))
)]
pub async fn healthz() -> impl IntoResponse {
    "ok"
}

/// Readiness: 503 until `SELECT 1` succeeds.
#[utoipa::path(
    get,
    path = "/readyz",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = String, content_type = "text/plain"),
        (status = 503, description = "Database unreachable", body = String, content_type = "text/plain"),
    )
)]
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.db.health_check().await {
        (StatusCode::OK, "ok")
    } else {
        warn!("Readiness check failed");
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}
