//! Request-scope middleware for axum.
//!
//! # Responsibilities
//! - Install a fresh request scope around every handler invocation
//! - Seed `requestId` / `traceId` / `timestamp` (request ID taken from the
//!   incoming `x-request-id` header when present, UUID v4 otherwise)
//! - Echo `x-request-id` on the response
//!
//! # Design Decisions
//! - The scope wraps `next.run(request)`, so extractors, handlers, and any
//!   downstream middleware all resolve the same scope via `current()`.
//! - Cancellation is left to the application: the middleware creates the
//!   scope but never cancels it, so handlers can wire `cancel()` to their
//!   own timeout or disconnect detection.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use serde_json::json;
use uuid::Uuid;

use crate::context::{data, run};

/// Header carrying the request ID, read and echoed by the middleware.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Wrap the handler chain in a request scope.
///
/// Use with `axum::middleware::from_fn`:
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use reqscope::context::current;
/// use reqscope::http::request_scope;
///
/// async fn handler() -> String {
///     let trace = current()
///         .and_then(|ctx| ctx.get("traceId"))
///         .map(|v| v.to_string())
///         .unwrap_or_default();
///     format!("trace {trace}")
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(middleware::from_fn(request_scope));
/// ```
pub async fn request_scope(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let trace_id = Uuid::new_v4().to_string();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    tracing::debug!(
        request_id = %request_id,
        trace_id = %trace_id,
        "Installing request scope"
    );

    let initial = data([
        ("requestId", json!(request_id.clone())),
        ("traceId", json!(trace_id)),
        ("timestamp", json!(timestamp)),
    ]);

    let mut response = run(initial, next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
