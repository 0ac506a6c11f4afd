// Cache collaborator boundary.
// The panel consumes the cache only through this interface and never
// keeps a copy of the cache's data.

pub mod fetch;
pub mod memory;

use std::sync::Arc;

use serde_json::Value;

pub use fetch::{FetchFuture, Fetcher, HttpFetcher};
pub use memory::MemoryCache;

/// Opaque string identifier for one cached entry.
pub type CacheKey = String;

/// Change listener invoked by the cache after every mutation.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// A client-side data-fetching cache as seen by the inspector panel.
///
/// The implementation owns storage, key generation, revalidation, and
/// notification; the panel only reads and issues mutation calls.
pub trait DataCache: Send + Sync {
    /// All keys currently in the cache, in insertion order.
    fn keys(&self) -> Vec<CacheKey>;

    /// Current value for `key`, or `None` when untracked.
    fn get(&self, key: &str) -> Option<Value>;

    /// Set the value for `key` and/or trigger a refetch.
    ///
    /// Calling with `None` and `revalidate` set is the conventional
    /// "force a refetch" form: the cache refetches in the background
    /// and updates the entry itself.
    fn mutate(&self, key: &str, value: Option<Value>, revalidate: bool);

    /// Remove the entry for `key`.
    fn delete(&self, key: &str);

    /// Remove every entry.
    fn clear(&self);

    /// Register a change listener. It stays registered until the
    /// returned guard is dropped.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// RAII guard for a registered listener; unsubscribes on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the closure that removes the listener from its cache.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
