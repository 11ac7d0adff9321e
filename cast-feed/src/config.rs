//! Configuration loading.
//!
//! Defaults first, then an optional JSON file, then environment overrides.

use crate::types::{FeedConfig, FeedError, FetchConfig, Result};
use crate::utils::url::is_valid_api_url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENV_API_URL: &str = "CAST_FEED_API_URL";
pub const ENV_API_KEY: &str = "CAST_FEED_API_KEY";
pub const ENV_SESSION_PATH: &str = "CAST_FEED_SESSION_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub feed: FeedConfig,
    pub session_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            feed: FeedConfig::default(),
            session_path: PathBuf::from("cast-feed-session.json"),
        }
    }
}

impl AppConfig {
    /// Load from `path` if given, then apply the process environment.
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).unwrap_or_else(|e| {
                warn!("Failed to load config from {:?}: {}", path, e);
                warn!("Using default configuration.");
                Self::default()
            }),
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.fetch.api_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.is_empty()) {
            self.fetch.api_key = Some(key);
        }
        if let Some(path) = lookup(ENV_SESSION_PATH) {
            self.session_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_api_url(&self.fetch.api_url) {
            return Err(FeedError::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.fetch.api_url
            )));
        }

        let feed = &self.feed;
        let sizes = [
            ("fan_out", feed.fan_out),
            ("cold_start_fan_out", feed.cold_start_fan_out),
            ("initial_page_size", feed.initial_page_size),
            ("scroll_page_size", feed.scroll_page_size),
            ("pinned_page_size", feed.pinned_page_size),
            ("thumbnail_page_size", feed.thumbnail_page_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(FeedError::Config(format!("{} must be at least 1", name)));
        }

        Ok(())
    }
}
