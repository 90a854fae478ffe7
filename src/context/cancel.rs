//! Cooperative cancellation for a single request scope.
//!
//! # Responsibilities
//! - Hold the monotonic cancel flag (Active → Cancelled, never back)
//! - Keep cleanup callbacks in registration order
//! - Fan out callbacks exactly once, each in its own fault boundary
//!
//! # Design Decisions
//! - Cancellation never interrupts running code; it flips a flag that
//!   in-flight work polls at safe points, then runs cleanup callbacks.
//! - A panicking callback is logged and counted but never propagated and
//!   never blocks later callbacks.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use crate::observability::metrics;

type CancelCallback = Box<dyn FnOnce() + Send>;

enum CancelState {
    Active { callbacks: Vec<CancelCallback> },
    Cancelled,
}

/// Monotonic cancel flag plus ordered cleanup-callback registry.
///
/// Owned by exactly one [`super::Scope`]. All methods take `&self`; the
/// interior mutex covers both the flag and the registry so the
/// flag-flip-then-drain transition is atomic with respect to registration.
pub struct CancelCell {
    state: Mutex<CancelState>,
}

impl CancelCell {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CancelState::Active {
                callbacks: Vec::new(),
            }),
        }
    }

    /// Whether `cancel()` has been called on this scope.
    pub fn is_cancelled(&self) -> bool {
        let state = self.state.lock().expect("cancel state mutex poisoned");
        matches!(*state, CancelState::Cancelled)
    }

    /// Register a cleanup callback.
    ///
    /// While the scope is active the callback is appended to the registry
    /// and will run, in registration order, when `cancel()` fires. If the
    /// scope is already cancelled the callback runs synchronously before
    /// this method returns and is not retained.
    pub fn on_cancel(&self, callback: CancelCallback) {
        let mut state = self.state.lock().expect("cancel state mutex poisoned");
        match &mut *state {
            CancelState::Active { callbacks } => {
                callbacks.push(callback);
            }
            CancelState::Cancelled => {
                // Run outside the lock; the callback may touch the scope.
                drop(state);
                invoke_isolated(callback, 0);
            }
        }
    }

    /// Flip the flag and drain the registry. Idempotent.
    ///
    /// The first call transitions to `Cancelled` and runs every registered
    /// callback in registration order; subsequent calls are no-ops. A panic
    /// inside one callback is isolated: it is reported via `tracing` and
    /// the remaining callbacks still run.
    pub fn cancel(&self) {
        let callbacks = {
            let mut state = self.state.lock().expect("cancel state mutex poisoned");
            match std::mem::replace(&mut *state, CancelState::Cancelled) {
                CancelState::Active { callbacks } => callbacks,
                CancelState::Cancelled => return,
            }
        };

        metrics::record_scope_cancelled();
        for (index, callback) in callbacks.into_iter().enumerate() {
            invoke_isolated(callback, index);
        }
    }
}

/// Run one cleanup callback inside its own fault boundary.
fn invoke_isolated(callback: CancelCallback, index: usize) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(callback)) {
        let reason = panic_message(&panic);
        tracing::error!(
            callback_index = index,
            reason = %reason,
            "Cancellation callback panicked; continuing with remaining callbacks"
        );
        metrics::record_callback_fault();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
