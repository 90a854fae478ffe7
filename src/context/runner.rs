//! Scope installation and ambient propagation.
//!
//! # Responsibilities
//! - `run` / `run_sync`: allocate a scope and make it ambient for the full
//!   dynamic extent of a callback
//! - Resolve the ambient scope from anywhere inside that extent
//! - Carry the scope across explicit `tokio::spawn` boundaries
//!
//! # Design Decisions
//! - The ambient slot is a `tokio::task_local!`; its `TaskLocalFuture`
//!   wrapper re-installs the binding at every poll, which is what lets the
//!   scope survive timers, I/O waits, and `join!` fan-in without any
//!   parameter threading. That wrapper is the propagation seam.
//! - Nested `run` shadows the enclosing scope and restores it when the
//!   nested extent ends (task-local bindings form a per-task stack).
//! - `tokio::spawn` does not inherit task-locals, so crossing a spawn
//!   boundary is explicit: `scoped` captures the current scope and
//!   re-installs it inside the wrapped future; `spawn_scoped` combines that
//!   with `tokio::spawn`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::Either;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::context::scope::Scope;
use crate::observability::metrics;

tokio::task_local! {
    static ACTIVE_SCOPE: Arc<Scope>;
}

/// Initial key/value data for a scope.
///
/// Keys `traceId`, `requestId`, `userId` and `timestamp` are conventions
/// used by the HTTP middleware; any string key is accepted.
pub type ScopeData = HashMap<String, Value>;

/// Build [`ScopeData`] from key/value pairs.
///
/// ```
/// use reqscope::context::data;
///
/// let initial = data([("traceId", "t1"), ("userId", "u42")]);
/// assert_eq!(initial.len(), 2);
/// ```
pub fn data<K, V, I>(pairs: I) -> ScopeData
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Run an async callback inside a fresh request scope.
///
/// Allocates a new [`Scope`] seeded with `initial` and installs it as the
/// ambient scope for `callback` and every continuation descended from it.
/// Returns the callback's output unmodified. Nested `run` calls shadow the
/// enclosing scope for their own extent only.
pub async fn run<Fut>(initial: ScopeData, callback: Fut) -> Fut::Output
where
    Fut: Future,
{
    let scope = Arc::new(Scope::new(initial));
    metrics::record_scope_created();
    ACTIVE_SCOPE.scope(scope, callback).await
}

/// Run a synchronous callback inside a fresh request scope.
pub fn run_sync<F, R>(initial: ScopeData, callback: F) -> R
where
    F: FnOnce() -> R,
{
    let scope = Arc::new(Scope::new(initial));
    metrics::record_scope_created();
    ACTIVE_SCOPE.sync_scope(scope, callback)
}

/// Resolve the ambient scope, if any.
pub(crate) fn current_scope() -> Option<Arc<Scope>> {
    ACTIVE_SCOPE.try_with(Arc::clone).ok()
}

/// Wrap a future so it carries the scope that is ambient right now.
///
/// Needed only when handing work to `tokio::spawn` (or another executor
/// entry point), which does not inherit task-locals. Inside one task the
/// ambient scope already follows every await. Outside any scope the future
/// is returned unwrapped.
pub fn scoped<Fut>(future: Fut) -> impl Future<Output = Fut::Output>
where
    Fut: Future,
{
    match current_scope() {
        Some(scope) => Either::Left(ACTIVE_SCOPE.scope(scope, future)),
        None => Either::Right(future),
    }
}

/// Spawn a task that inherits the currently ambient scope.
pub fn spawn_scoped<Fut>(future: Fut) -> JoinHandle<Fut::Output>
where
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    tokio::spawn(scoped(future))
}
