//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! context + cache produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → Log aggregation (stdout by default)
//!     → Whatever metrics recorder the application installs
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap facade calls; without an installed recorder
//!   they are no-ops, so the library never forces an exporter on consumers.
//! - Callback faults and evictions are logged with structured fields so the
//!   request id in the surrounding span ties them to a flow.

pub mod logging;
pub mod metrics;
