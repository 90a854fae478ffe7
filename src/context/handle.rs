//! The public read/write/cancel surface over the ambient scope.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::context::runner::current_scope;
use crate::context::scope::Scope;
use crate::error::ContextError;

/// Handle to one scope record, bound at the moment of resolution.
///
/// Cloning a handle does not copy any data; every clone reads and writes
/// the same underlying scope. A handle stays valid after the `run` extent
/// it was resolved in has ended, so cleanup code may keep one around.
#[derive(Clone)]
pub struct ContextHandle {
    scope: Arc<Scope>,
}

impl ContextHandle {
    pub(crate) fn new(scope: Arc<Scope>) -> Self {
        Self { scope }
    }

    /// Read an entry from the scope.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.scope.get(key)
    }

    /// Write an entry into the scope.
    ///
    /// The write is immediately visible to every other handle bound to the
    /// same scope; last write wins.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.scope.set(key, value);
    }

    /// Point-in-time snapshot of all entries; detached from the live scope.
    pub fn get_all(&self) -> HashMap<String, Value> {
        self.scope.snapshot()
    }

    /// Whether this scope has been cancelled.
    ///
    /// Cancellation is cooperative: long-running work should poll this at
    /// safe points, since nothing is ever preempted.
    pub fn is_cancelled(&self) -> bool {
        self.scope.cancel_cell().is_cancelled()
    }

    /// Register a cleanup callback to run when the scope is cancelled.
    ///
    /// Callbacks run in registration order. If the scope is already
    /// cancelled the callback runs synchronously before this returns.
    pub fn on_cancel(&self, callback: impl FnOnce() + Send + 'static) {
        self.scope.cancel_cell().on_cancel(Box::new(callback));
    }

    /// Cancel this scope. Idempotent; see [`crate::context::cancel`].
    pub fn cancel(&self) {
        self.scope.cancel_cell().cancel();
    }
}

impl std::fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextHandle")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Resolve the ambient scope, permissively.
///
/// Returns `None` outside any `run` extent; absence of a scope is an
/// expected condition for this accessor.
pub fn current() -> Option<ContextHandle> {
    current_scope().map(ContextHandle::new)
}

/// Resolve the ambient scope, strictly.
///
/// Fails with [`ContextError::NoActiveScope`] outside any `run` extent; use
/// this where a missing scope is a programming error.
pub fn try_current() -> Result<ContextHandle, ContextError> {
    current_scope()
        .map(ContextHandle::new)
        .ok_or(ContextError::NoActiveScope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::runner::{data, run_sync};
    use serde_json::json;

    #[test]
    fn resolution_outside_any_scope() {
        assert!(current().is_none());
        assert_eq!(try_current().unwrap_err(), ContextError::NoActiveScope);
    }

    #[test]
    fn handles_share_one_scope() {
        run_sync(data([("traceId", "t1")]), || {
            let a = try_current().unwrap();
            let b = current().unwrap();

            a.set("userId", "u7");
            assert_eq!(b.get("userId"), Some(json!("u7")));
            assert_eq!(b.get("traceId"), Some(json!("t1")));
        });
    }

    #[test]
    fn handle_outlives_extent() {
        let handle = run_sync(data([("k", 1)]), || current().unwrap());
        // The extent ended but the handle still reads its scope.
        assert_eq!(handle.get("k"), Some(json!(1)));
        assert!(current().is_none());
    }
}
