//! Request-scoped middleware.
//!
//! ```text
//! request ──► request_context ──► request_timeout ──► catch panic ──► handler
//!              │  x-request-id       │  tokio::time::timeout  │  500 INTERNAL
//!              │  `request` span     │  503 on expiry, future dropped
//!              ▼                     │  (open transaction rolls back)
//!             "request completed" status, duration_ms
//! ```

use std::any::Any;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller-supplied request id that is honored.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Assigns a request id and runs the rest of the stack inside a `request` span.
///
/// Every event logged while handling the request carries `req_id`,
/// `method` and `path`.
pub async fn request_context(req: Request, next: Next) -> Response {
    let req_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!(
        "request",
        req_id = %req_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let start = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            duration_ms = millis(start.elapsed()),
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&req_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Aborts the handler after `REQUEST_TIMEOUT_SECS`.
pub async fn request_timeout(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limit = state.config.request_timeout;

    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(timeout_ms = millis(limit), "Request timed out");
            ApiError::timeout().into_response()
        }
    }
}

/// Renders a handler panic as the generic 500 body. Used with
/// `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_panic_response_is_generic_500() {
        let response = panic_response(Box::new("secret detail".to_string()));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
