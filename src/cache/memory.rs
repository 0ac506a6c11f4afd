// In-memory reference cache with change notification.
// Backs the demo binary and tests; revalidation refetches through a
// Fetcher on the tokio runtime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;

use crate::cache::fetch::Fetcher;
use crate::cache::{CacheKey, DataCache, Listener, Subscription};
use crate::key;

/// Entries plus a separate key vector preserving insertion order.
#[derive(Default)]
struct Store {
    order: Vec<CacheKey>,
    entries: HashMap<CacheKey, Value>,
}

impl Store {
    /// Insert or replace; a replaced key keeps its position.
    fn insert(&mut self, key: &str, value: Value) {
        if !self.entries.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }
}

struct Inner {
    store: RwLock<Store>,
    listeners: Mutex<HashMap<u64, Listener>>,
    next_listener_id: AtomicU64,
    fetcher: Option<Arc<dyn Fetcher>>,
}

/// In-memory cache with insertion-ordered keys and change listeners.
///
/// Cloning is cheap and shares the underlying store, matching how a
/// process-wide cache is handed to several consumers.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Arc<Inner>,
}

impl MemoryCache {
    /// Cache without a fetcher; revalidation requests are ignored.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Cache that refetches through `fetcher` on revalidation.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::build(Some(fetcher))
    }

    fn build(fetcher: Option<Arc<dyn Fetcher>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: RwLock::new(Store::default()),
                listeners: Mutex::new(HashMap::new()),
                next_listener_id: AtomicU64::new(1),
                fetcher,
            }),
        }
    }

    /// Set `key` to `value` and notify listeners.
    pub fn set(&self, key: &str, value: Value) {
        self.inner.store.write().unwrap().insert(key, value);
        self.notify();
    }

    /// Number of currently registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().unwrap().len()
    }

    /// Invoke every listener. Runs outside the store lock so listeners
    /// can read back through the cache.
    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Refetch `key` in the background and store the outcome.
    ///
    /// A successful fetch replaces the value and removes the `err@`
    /// companion entry; a failed fetch records the error text under it.
    fn spawn_revalidation(&self, key: &str) {
        let Some(fetcher) = self.inner.fetcher.clone() else {
            return;
        };
        let cache = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            match fetcher.fetch(&key).await {
                Ok(value) => {
                    {
                        let mut store = cache.inner.store.write().unwrap();
                        store.remove(&key::error_key_for(&key));
                        store.insert(&key, value);
                    }
                    cache.notify();
                }
                Err(err) => {
                    cache.set(&key::error_key_for(&key), Value::String(err.to_string()));
                }
            }
        });
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DataCache for MemoryCache {
    fn keys(&self) -> Vec<CacheKey> {
        self.inner.store.read().unwrap().order.clone()
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.inner.store.read().unwrap().entries.get(key).cloned()
    }

    fn mutate(&self, key: &str, value: Option<Value>, revalidate: bool) {
        if let Some(value) = value {
            self.set(key, value);
        }
        if revalidate {
            self.spawn_revalidation(key);
        }
    }

    fn delete(&self, key: &str) {
        let removed = self.inner.store.write().unwrap().remove(key);
        if removed {
            self.notify();
        }
    }

    fn clear(&self) {
        {
            let mut store = self.inner.store.write().unwrap();
            store.order.clear();
            store.entries.clear();
        }
        self.notify();
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().unwrap().insert(id, listener);
        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.listeners.lock().unwrap().remove(&id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::fetch::FetchFuture;
    use crate::error::CachepeekError;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct StubFetcher {
        fail: bool,
    }

    impl Fetcher for StubFetcher {
        fn fetch(&self, key: &str) -> FetchFuture {
            let fail = self.fail;
            let key = key.to_string();
            Box::pin(async move {
                if fail {
                    Err(CachepeekError::Other(format!("refetch failed for {}", key)))
                } else {
                    Ok(json!({ "key": key, "fresh": true }))
                }
            })
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within timeout");
    }

    #[test]
    fn test_keys_preserve_insertion_order() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        cache.set("c", json!(3));
        assert_eq!(cache.keys(), vec!["a", "b", "c"]);

        cache.delete("b");
        assert_eq!(cache.keys(), vec!["a", "c"]);

        // Replacing a key keeps its position.
        cache.set("a", json!(10));
        assert_eq!(cache.keys(), vec!["a", "c"]);
        assert_eq!(cache.get("a"), Some(json!(10)));
    }

    #[test]
    fn test_get_absent_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1));
        cache.set("b", json!(2));
        cache.clear();
        assert!(cache.keys().is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_listeners_notified_on_every_mutation() {
        let cache = MemoryCache::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let _guard = cache.subscribe(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        cache.set("a", json!(1));
        cache.delete("a");
        cache.clear();
        assert_eq!(count.load(Ordering::SeqCst), 3);

        // Deleting an untracked key does not notify.
        cache.delete("missing");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_subscription_drop_removes_listener() {
        let cache = MemoryCache::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let guard = cache.subscribe(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(cache.subscriber_count(), 1);

        drop(guard);
        assert_eq!(cache.subscriber_count(), 0);

        cache.set("a", json!(1));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_isolation() {
        let cache = MemoryCache::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&first);
        let first_guard = cache.subscribe(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        let seen = Arc::clone(&second);
        let _second_guard = cache.subscribe(Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        drop(first_guard);
        cache.set("a", json!(1));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_revalidate_without_fetcher_is_ignored() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1));
        cache.mutate("a", None, true);
        assert_eq!(cache.get("a"), Some(json!(1)));
    }

    #[test]
    fn test_mutate_with_value_sets_entry() {
        let cache = MemoryCache::new();
        cache.mutate("a", Some(json!({"v": 1})), false);
        assert_eq!(cache.get("a"), Some(json!({"v": 1})));
    }

    #[tokio::test]
    async fn test_revalidation_success_replaces_value_and_clears_error() {
        let cache = MemoryCache::with_fetcher(Arc::new(StubFetcher { fail: false }));
        cache.set("projects", json!(["old"]));
        cache.set("err@projects", json!("stale failure"));

        cache.mutate("projects", None, true);

        let probe = cache.clone();
        wait_until(move || probe.get("projects") == Some(json!({"key": "projects", "fresh": true})))
            .await;
        assert_eq!(cache.get("err@projects"), None);
    }

    #[tokio::test]
    async fn test_revalidation_failure_records_error_entry() {
        let cache = MemoryCache::with_fetcher(Arc::new(StubFetcher { fail: true }));
        cache.set("projects", json!(["old"]));

        cache.mutate("projects", None, true);

        let probe = cache.clone();
        wait_until(move || probe.get("err@projects").is_some()).await;
        assert_eq!(
            cache.get("err@projects"),
            Some(json!("refetch failed for projects"))
        );
        // The stale value stays until a successful refetch.
        assert_eq!(cache.get("projects"), Some(json!(["old"])));
    }
}
