//! Terminal inspector panel for a client-side data-fetching cache.
//!
//! The panel renders the cache's key set in a left pane, pretty-prints
//! the selected entry's JSON value in a right pane, and forwards the
//! mutation actions (revalidate, delete entry, clear cache) straight to
//! the cache. All state except the transient selection lives in the
//! cache, observed through [`subscription::KeySubscription`]; the panel
//! never keeps its own copy of cache data.
//!
//! The cache itself sits behind [`cache::DataCache`], so any store that
//! can enumerate keys, serve values, and push change notifications can
//! be inspected. [`cache::MemoryCache`] is the bundled reference
//! implementation used by the demo binary.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod subscription;
pub mod ui;
