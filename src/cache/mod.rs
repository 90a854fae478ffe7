//! Cache-aside layer with TTL expiry and LRU capacity eviction.
//!
//! # Data Flow
//! ```text
//! get_or_set(key, factory, ttl?)
//!     → ttl_cache.rs (hit: return cached value, promote recency)
//!     → miss: invoke factory, store result
//!         → lru.rs (promote key; evict least-recently-touched on overflow)
//!         → ttl: spawn deferred eviction at the original deadline
//! ```
//!
//! # Design Decisions
//! - Explicitly constructed component (`TtlCache::new`), cloneable handle;
//!   no module-level singleton. The composition root owns it.
//! - Independent of the context subsystem; application code may use both
//!   inside one request scope.
//! - No single-flight coordination: concurrent misses on one key may each
//!   invoke the factory (the interior mutex cannot be held across await).
//! - A scheduled TTL eviction fires at its original deadline and removes
//!   whatever value then occupies the key, even after an overwrite.

pub mod lru;
pub mod ttl_cache;

pub use ttl_cache::{CacheStats, TtlCache};
