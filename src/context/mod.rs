//! Request-scoped ambient context subsystem.
//!
//! # Data Flow
//! ```text
//! run(initial_data, callback)
//!     → scope.rs (allocate Scope: entries + cancel cell)
//!     → runner.rs (install Arc<Scope> in the task-local slot for the
//!       full extent of callback, re-installed on every poll)
//!     → callback + nested continuations resolve the scope via
//!       current() / try_current()
//!     → handle.rs (ContextHandle: get/set/get_all/cancel surface)
//!     → cancel.rs (flag flip + ordered cleanup callback fan-out)
//! ```
//!
//! # Design Decisions
//! - Propagation rides `tokio::task_local!`: the `TaskLocalFuture` wrapper
//!   re-installs the binding at each resumption, so the scope survives any
//!   number of suspension points without parameter threading.
//! - Concurrent `run` extents are isolated; task-local bindings never alias
//!   across sibling futures, regardless of interleaving.
//! - Cancellation is cooperative: a pollable flag plus cleanup callbacks.
//!   Nothing is preempted; long-running work polls `is_cancelled()`.
//! - Scope entries are shared-mutable, last write wins; handles see every
//!   write immediately. Snapshots (`get_all`) are shallow copies.

pub mod cancel;
pub mod handle;
pub mod runner;
pub mod scope;

pub use handle::{current, try_current, ContextHandle};
pub use runner::{data, run, run_sync, scoped, spawn_scoped, ScopeData};
pub use scope::Scope;
