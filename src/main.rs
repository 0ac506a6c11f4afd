// Binary entry point.
// Loads the config, seeds a demo cache, and runs the panel on the
// alternate screen.

use std::fs;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde_json::{Value, json};

use cachepeek::app::App;
use cachepeek::cache::{FetchFuture, Fetcher, HttpFetcher, MemoryCache};
use cachepeek::config::Config;
use cachepeek::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let cache = build_cache(&config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::new(cache), &config);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Build the demo cache: revalidation goes through HTTP when a base URL
/// is configured, otherwise through an offline stand-in fetcher.
fn build_cache(config: &Config) -> Result<MemoryCache> {
    let fetcher: Arc<dyn Fetcher> = match &config.fetch_base_url {
        Some(base_url) => Arc::new(HttpFetcher::new(base_url.clone())?),
        None => Arc::new(DemoFetcher::default()),
    };
    let cache = MemoryCache::with_fetcher(fetcher);
    seed_cache(&cache, config)?;
    Ok(cache)
}

/// Seed the cache from the configured seed file (a JSON object of
/// key/value pairs) or from built-in sample entries.
fn seed_cache(cache: &MemoryCache, config: &Config) -> Result<()> {
    if let Some(path) = &config.seed_path {
        let contents = fs::read_to_string(path)?;
        let entries: serde_json::Map<String, Value> = serde_json::from_str(&contents)?;
        for (key, value) in entries {
            cache.set(&key, value);
        }
        return Ok(());
    }

    cache.set("project/1", json!({ "id": 1, "name": "alpha", "stars": 42 }));
    cache.set(
        "projects",
        json!([
            { "id": 1, "name": "alpha" },
            { "id": 2, "name": "beta" },
        ]),
    );
    cache.set(
        "arg@project-search@terminal",
        json!([{ "id": 3, "name": "gamma" }]),
    );
    cache.set(
        "err@key-error",
        json!("request failed: 500 Internal Server Error"),
    );
    Ok(())
}

/// Offline stand-in fetcher: waits briefly, then returns a payload
/// recording how often it has been asked to refetch.
#[derive(Default)]
struct DemoFetcher {
    revalidations: AtomicU64,
}

impl Fetcher for DemoFetcher {
    fn fetch(&self, key: &str) -> FetchFuture {
        let count = self.revalidations.fetch_add(1, Ordering::Relaxed) + 1;
        let key = key.to_string();
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Ok(json!({ "key": key, "revalidations": count, "source": "demo" }))
        })
    }
}
