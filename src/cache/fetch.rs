// Fetcher abstraction for cache revalidation.
// Maps cache keys onto HTTP resources and fetches fresh JSON values.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use serde_json::Value;

use crate::error::{CachepeekError, Result};
use crate::key::ParsedKey;

/// Future returned by [`Fetcher::fetch`].
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// Produces a fresh value for a cache key during revalidation.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, key: &str) -> FetchFuture;
}

/// Fetcher that resolves keys against a JSON HTTP API.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cachepeek")
            .build()
            .map_err(CachepeekError::Api)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Resolve a key to a request URL.
    ///
    /// Only the payload segments are used, so revalidating an `err@` or
    /// `arg@` key refetches the underlying resource.
    fn url_for(&self, key: &str) -> String {
        let parsed = ParsedKey::decode(key);
        let path = parsed.payload().join("/");
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, key: &str) -> FetchFuture {
        let client = self.client.clone();
        let url = self.url_for(key);
        Box::pin(async move {
            let response = client.get(&url).send().await.map_err(CachepeekError::Api)?;
            let status = response.status();
            if !status.is_success() {
                return Err(CachepeekError::Fetch {
                    url,
                    status: status.as_u16(),
                });
            }
            let value = response.json::<Value>().await.map_err(CachepeekError::Api)?;
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_plain_keys() {
        let fetcher = HttpFetcher::new("https://api.example.com").unwrap();
        assert_eq!(fetcher.url_for("projects"), "https://api.example.com/projects");
        assert_eq!(
            fetcher.url_for("project/1"),
            "https://api.example.com/project/1"
        );
    }

    #[test]
    fn test_url_for_tagged_keys_skips_tag() {
        let fetcher = HttpFetcher::new("https://api.example.com").unwrap();
        assert_eq!(
            fetcher.url_for("arg@search@rust"),
            "https://api.example.com/search/rust"
        );
        assert_eq!(
            fetcher.url_for("err@projects"),
            "https://api.example.com/projects"
        );
    }

    #[test]
    fn test_url_for_normalizes_slashes() {
        let fetcher = HttpFetcher::new("https://api.example.com/").unwrap();
        assert_eq!(fetcher.url_for("/projects"), "https://api.example.com/projects");
    }
}
