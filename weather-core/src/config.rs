use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::provider::openweather::CURRENT_WEATHER_URL;

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_UPSTREAM_URL: &str = "OPENWEATHER_URL";
pub const ENV_LISTEN_ADDR: &str = "WEATHER_LISTEN_ADDR";
pub const ENV_PROXY_URL: &str = "WEATHER_PROXY_URL";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Configuration shared by the proxy server and the CLI widget.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// listen_addr = "0.0.0.0:8080"
/// proxy_url = "http://weather.internal:8080"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OpenWeather credential. Only the server needs it.
    pub api_key: Option<String>,

    /// Override for the upstream current-weather endpoint.
    pub upstream_url: Option<String>,

    /// Socket address the proxy binds to.
    pub listen_addr: Option<String>,

    /// Base URL the widget uses to reach the proxy.
    pub proxy_url: Option<String>,
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Non-empty values returned by `lookup` replace whatever the file said.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = Some(v);
        }
        if let Some(v) = get(ENV_UPSTREAM_URL) {
            self.upstream_url = Some(v);
        }
        if let Some(v) = get(ENV_LISTEN_ADDR) {
            self.listen_addr = Some(v);
        }
        if let Some(v) = get(ENV_PROXY_URL) {
            self.proxy_url = Some(v);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn upstream_url(&self) -> &str {
        self.upstream_url.as_deref().unwrap_or(CURRENT_WEATHER_URL)
    }

    pub fn listen_addr(&self) -> &str {
        self.listen_addr.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR)
    }

    pub fn proxy_url(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(DEFAULT_PROXY_URL)
    }
}
