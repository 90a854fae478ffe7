//! Request-scoped ambient context with cooperative cancellation, plus a
//! TTL/LRU cache-aside layer.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌─────────────────────────────────────────────────┐
//!                  │                    reqscope                     │
//!                  │                                                 │
//! run(data, fut)   │  ┌──────────┐    ┌─────────┐    ┌───────────┐   │
//! ─────────────────┼─▶│  runner  │───▶│  scope  │───▶│  cancel   │   │
//!                  │  │task-local│    │ entries │    │flag + cbs │   │
//!                  │  └────┬─────┘    └─────────┘    └───────────┘   │
//!                  │       │ current() / try_current()               │
//!                  │       ▼                                         │
//!                  │  ┌──────────┐        ┌────────────────────┐     │
//!                  │  │  handle  │        │       cache        │     │
//!                  │  │ get/set/ │        │  TTL + LRU aside   │     │
//!                  │  │  cancel  │        │   (independent)    │     │
//!                  │  └──────────┘        └────────────────────┘     │
//!                  │                                                 │
//!                  │  ┌───────────────────────────────────────────┐  │
//!                  │  │          Cross-Cutting Concerns           │  │
//!                  │  │   http middleware · logging · metrics     │  │
//!                  │  └───────────────────────────────────────────┘  │
//!                  └─────────────────────────────────────────────────┘
//! ```
//!
//! The two subsystems are independent: the cache never touches the context
//! machinery, and application code is free to use both inside one request
//! scope.
//!
//! Cancellation is cooperative, never preemptive. `cancel()` flips a flag
//! that in-flight work polls via `is_cancelled()`, then runs ordered
//! cleanup callbacks; it interrupts nothing.

// Core subsystems
pub mod cache;
pub mod context;

// Cross-cutting concerns
pub mod error;
pub mod http;
pub mod observability;

pub use cache::{CacheStats, TtlCache};
pub use context::{current, data, run, run_sync, spawn_scoped, try_current, ContextHandle};
pub use error::ContextError;
