//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Respects `RUST_LOG`, defaulting to debug output for this crate. Call
/// once from the application's composition root; libraries and tests that
/// already installed a subscriber should skip this.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reqscope=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
