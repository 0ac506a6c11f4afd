// Push-to-pull bridge over the cache's change notifications.
// Getters always read through to the cache; nothing is copied locally,
// so the rendered state can never be staler than the last notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::cache::{CacheKey, DataCache, Subscription};

/// Live view of the cache's key set and values.
///
/// Registers one listener on construction and removes it when dropped,
/// so mounting and unmounting panels never leaks listeners.
pub struct KeySubscription {
    cache: Arc<dyn DataCache>,
    dirty: Arc<AtomicBool>,
    _guard: Subscription,
}

impl KeySubscription {
    /// Subscribe to `cache`. The dirty flag starts set so the first
    /// render reconciles against current state.
    pub fn new(cache: Arc<dyn DataCache>) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&dirty);
        let guard = cache.subscribe(Arc::new(move || {
            flag.store(true, Ordering::SeqCst);
        }));
        Self {
            cache,
            dirty,
            _guard: guard,
        }
    }

    /// Keys currently in the cache, in insertion order.
    pub fn current_keys(&self) -> Vec<CacheKey> {
        self.cache.keys()
    }

    /// Current value for `key`, or `None` when untracked.
    pub fn current_value(&self, key: &str) -> Option<Value> {
        self.cache.get(key)
    }

    /// True once per notification since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    /// The cache this subscription observes.
    pub fn cache(&self) -> &Arc<dyn DataCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use serde_json::json;

    #[test]
    fn test_reads_pass_through_to_cache() {
        let cache = MemoryCache::new();
        let subscription = KeySubscription::new(Arc::new(cache.clone()));

        cache.set("a", json!(1));
        cache.set("b", json!({"nested": true}));
        assert_eq!(subscription.current_keys(), vec!["a", "b"]);
        assert_eq!(subscription.current_value("b"), Some(json!({"nested": true})));

        cache.delete("a");
        assert_eq!(subscription.current_keys(), vec!["b"]);
        assert_eq!(subscription.current_value("a"), None);
    }

    #[test]
    fn test_dirty_flag_tracks_notifications() {
        let cache = MemoryCache::new();
        let subscription = KeySubscription::new(Arc::new(cache.clone()));

        // Set at construction so the first render reconciles.
        assert!(subscription.take_dirty());
        assert!(!subscription.take_dirty());

        cache.set("a", json!(1));
        assert!(subscription.take_dirty());
        assert!(!subscription.take_dirty());
    }

    #[test]
    fn test_drop_unregisters_listener() {
        let cache = MemoryCache::new();
        let subscription = KeySubscription::new(Arc::new(cache.clone()));
        assert_eq!(cache.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(cache.subscriber_count(), 0);
    }

    #[test]
    fn test_two_panels_are_isolated() {
        let cache = MemoryCache::new();
        let first = KeySubscription::new(Arc::new(cache.clone()));
        let second = KeySubscription::new(Arc::new(cache.clone()));
        first.take_dirty();
        second.take_dirty();

        drop(first);
        cache.set("a", json!(1));

        assert!(second.take_dirty());
        assert_eq!(cache.subscriber_count(), 1);
    }
}
