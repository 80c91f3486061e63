//! Service configuration loaded from TOML.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_FEED_URL: &str = "https://example.com/evacuation-zones.geojson";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub feed: FeedConfig,
    pub refresh: RefreshConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// `http(s)://` URL or local file path of the GeoJSON feed
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: 30,
            user_agent: "Haven/0.1 (hazard-zone lookup)".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_secs == 0 {
            anyhow::bail!("refresh.interval_secs must be greater than zero");
        }
        if self.feed.timeout_secs == 0 {
            anyhow::bail!("feed.timeout_secs must be greater than zero");
        }
        if self.feed.url.trim().is_empty() {
            anyhow::bail!("feed.url must not be empty");
        }
        if self.feed.url.contains("://") {
            let url = Url::parse(&self.feed.url)
                .with_context(|| format!("Invalid feed URL '{}'", self.feed.url))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("Unsupported feed URL scheme '{}'", url.scheme());
            }
        } else if !Path::new(&self.feed.url).is_file() {
            anyhow::bail!("Feed file '{}' does not exist", self.feed.url);
        }
        self.server
            .listen
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid listen address '{}'", self.server.listen))?;
        Ok(())
    }
}
