//! Configuration model.
//!
//! Loaded from `<config dir>/od_catalog/config.toml` when present. Environment
//! variables override the file:
//! - `OD_CATALOG_USER_AGENT`: User-Agent header sent with every request
//! - `OD_CATALOG_TIMEOUT`: Request timeout in seconds

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP configuration.
    pub http: HttpConfig,
    /// Crawl configuration.
    pub crawl: CrawlConfig,
    /// Picker configuration.
    pub picker: PickerConfig,
}

/// HTTP configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

/// Crawl configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Directory names (with trailing slash) that hold subtitles. Case-sensitive.
    pub subtitle_dirs: Vec<String>,
    /// Abort the whole crawl when any sub-directory fails to load.
    pub fail_fast: bool,
}

/// Picker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Maximum number of rows the picker shows at once.
    pub max_rows: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("od-catalog/{}", env!("CARGO_PKG_VERSION")),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            subtitle_dirs: vec!["Subs/".to_string(), "Sub/".to_string()],
            fail_fast: false,
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self { max_rows: 20 }
    }
}

impl Config {
    /// Apply environment overrides using the given lookup.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user_agent) = lookup("OD_CATALOG_USER_AGENT") {
            self.http.user_agent = user_agent;
        }
        if let Some(timeout) = lookup("OD_CATALOG_TIMEOUT").and_then(|s| s.parse().ok()) {
            self.http.timeout = timeout;
        }
        self
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("od_catalog")
}

/// Load configuration from a specific file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)))
}

/// Load configuration from the default location, falling back to defaults.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    let config = if config_path.exists() {
        match load_config_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {}", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    config.with_env_overrides(|key| std::env::var(key).ok())
}
