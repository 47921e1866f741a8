//! Layered application settings
//!
//! Settings are resolved from, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (`~/.config/recipebook/` on Linux)
//! 3. An explicit file passed with `--config`
//! 4. Environment variables with the `RECIPEBOOK__` prefix
//!
//! Environment variable format: `RECIPEBOOK__API__API_KEY`, `RECIPEBOOK__CACHE__TTL_SECS`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::data::client::SPOONACULAR_BASE_URL;
use crate::error::ConfigError;

/// What the random-batch fetch does after its own request fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomFallback {
    /// Try one popularity-sorted search before surfacing the error
    #[default]
    PopularSearch,
    /// Surface the random-batch error directly
    Disabled,
}

/// Upstream API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Required; there is no built-in key
    #[serde(default)]
    pub api_key: String,
    /// Timeout for data requests in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Timeout for the connectivity probe in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Batch cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Freshness window of the cached batch in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Fetch sizes and fallback policy
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    /// Recipes per random batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Similar recipes shown on the detail view
    #[serde(default = "default_similar_count")]
    pub similar_count: usize,
    /// Results per free-text search
    #[serde(default = "default_search_count")]
    pub search_count: usize,
    /// Tags passed to the random endpoint
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub random_fallback: RandomFallback,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            similar_count: default_similar_count(),
            search_count: default_search_count(),
            tags: Vec::new(),
            random_fallback: RandomFallback::default(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
}

// Default value functions
fn default_base_url() -> String {
    SPOONACULAR_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_batch_size() -> usize {
    8
}

fn default_similar_count() -> usize {
    4
}

fn default_search_count() -> usize {
    20
}

/// Returns the platform config file path, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "recipebook").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Settings {
    /// Loads settings from all sources and validates them
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = load_settings(default_config_path().as_deref(), explicit_file)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "api.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        let counts = [
            ("fetch.batch_size", self.fetch.batch_size),
            ("fetch.similar_count", self.fetch.similar_count),
            ("fetch.search_count", self.fetch.search_count),
        ];
        if let Some(&(key, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid {
                key,
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builds settings from the given files and the environment without validating
///
/// The platform file is optional; an explicit file must exist.
pub fn load_settings(
    platform_file: Option<&Path>,
    explicit_file: Option<&Path>,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = platform_file {
        builder = builder.add_source(File::from(path).required(false));
    }
    if let Some(path) = explicit_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix("RECIPEBOOK")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("fetch.tags")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}
