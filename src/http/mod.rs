//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → middleware.rs (read or generate x-request-id, seed scope data)
//!     → run(initial, next.run(request)): the handler chain executes
//!       inside the request scope
//!     → response gains the x-request-id header
//! ```

pub mod middleware;

pub use middleware::{request_scope, X_REQUEST_ID};
