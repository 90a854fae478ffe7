//! The scope record: one mutable key/value store per `run` extent.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::context::cancel::CancelCell;

/// Per-request scope record.
///
/// Created by [`super::run`] and shared, behind an `Arc`, between the
/// task-local slot and every [`super::ContextHandle`] resolved against it.
/// Entries are shared-mutable with last-write-wins semantics; there is no
/// per-handle copy. The embedded [`CancelCell`] carries the cooperative
/// cancellation state.
///
/// Tokio may resume continuations of one scope on different worker threads,
/// so both the entry map and the cancel state sit behind mutexes. Locks are
/// never held across an await point.
pub struct Scope {
    entries: Mutex<HashMap<String, Value>>,
    cancel: CancelCell,
}

impl Scope {
    pub(crate) fn new(initial: HashMap<String, Value>) -> Self {
        Self {
            entries: Mutex::new(initial),
            cancel: CancelCell::new(),
        }
    }

    /// Read one entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().expect("scope entries mutex poisoned");
        entries.get(key).cloned()
    }

    /// Write one entry. Immediately visible to every handle of this scope.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut entries = self.entries.lock().expect("scope entries mutex poisoned");
        entries.insert(key.into(), value.into());
    }

    /// Point-in-time shallow snapshot of all entries.
    ///
    /// Mutating the returned map does not affect the live scope.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        let entries = self.entries.lock().expect("scope entries mutex poisoned");
        entries.clone()
    }

    pub(crate) fn cancel_cell(&self) -> &CancelCell {
        &self.cancel
    }
}
