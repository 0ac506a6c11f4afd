// Configuration loading.
// Reads an optional JSON config file from the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CachepeekError, Result};

/// Default event-loop poll interval in milliseconds.
const DEFAULT_TICK_RATE_MS: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event-loop poll interval in milliseconds.
    pub tick_rate_ms: u64,
    /// Base URL revalidation fetches against; unset disables refetching.
    pub fetch_base_url: Option<String>,
    /// JSON object of key/value pairs loaded into the demo cache at startup.
    pub seed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            fetch_base_url: None,
            seed_path: None,
        }
    }
}

/// Path to the config file (~/.config/cachepeek/config.json on Linux).
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cachepeek").map(|dirs| dirs.config_dir().join("config.json"))
}

impl Config {
    /// Load the config file if present, defaults otherwise.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| CachepeekError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(config.tick_rate_ms, DEFAULT_TICK_RATE_MS);
        assert!(config.fetch_base_url.is_none());
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"fetch_base_url": "https://api.example.com"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tick_rate_ms, DEFAULT_TICK_RATE_MS);
        assert_eq!(
            config.fetch_base_url.as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(CachepeekError::Config(_))));
    }
}
