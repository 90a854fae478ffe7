//! Recency tracking for capacity eviction.

use std::collections::VecDeque;

/// Ordered recency list: front is least recently used, back is most.
///
/// Kept separate from the value map so the cache's single mutex covers both
/// structures together. Operations are linear in the number of tracked keys,
/// which is bounded by the cache capacity.
#[derive(Debug, Default)]
pub(crate) struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Promote `key` to most recently used, inserting it if untracked.
    pub fn touch(&mut self, key: &str) {
        if let Some(position) = self.order.iter().position(|k| k == key) {
            self.order.remove(position);
        }
        self.order.push_back(key.to_string());
    }

    /// Stop tracking `key`.
    pub fn remove(&mut self, key: &str) {
        if let Some(position) = self.order.iter().position(|k| k == key) {
            self.order.remove(position);
        }
    }

    /// Pop the least recently used key.
    pub fn pop_lru(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
