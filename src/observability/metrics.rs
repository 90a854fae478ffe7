//! Metrics collection.
//!
//! # Metrics
//! - `reqscope_scopes_total` (counter): scopes created by `run`/`run_sync`
//! - `reqscope_scopes_cancelled_total` (counter): scopes cancelled
//! - `reqscope_callback_faults_total` (counter): panics inside cancellation
//!   callbacks
//! - `reqscope_cache_hits_total` / `reqscope_cache_misses_total` (counters)
//! - `reqscope_cache_evictions_total` (counter): labeled by `reason`
//!   (`capacity` or `ttl`)
//!
//! # Design Decisions
//! - The `metrics` facade only; no recorder or exporter is installed here.
//! - Counters over gauges: sizes are cheap to read on demand via
//!   `TtlCache::stats`.

use metrics::counter;

/// Record a scope created by `run` or `run_sync`.
pub fn record_scope_created() {
    counter!("reqscope_scopes_total").increment(1);
}

/// Record a scope transitioning to cancelled.
pub fn record_scope_cancelled() {
    counter!("reqscope_scopes_cancelled_total").increment(1);
}

/// Record a panic inside a cancellation callback.
pub fn record_callback_fault() {
    counter!("reqscope_callback_faults_total").increment(1);
}

/// Record a cache lookup that found a live entry.
pub fn record_cache_hit() {
    counter!("reqscope_cache_hits_total").increment(1);
}

/// Record a cache lookup that found nothing.
pub fn record_cache_miss() {
    counter!("reqscope_cache_misses_total").increment(1);
}

/// Record an evicted cache entry; `reason` is `capacity` or `ttl`.
pub fn record_cache_eviction(reason: &'static str) {
    counter!("reqscope_cache_evictions_total", "reason" => reason).increment(1);
}
