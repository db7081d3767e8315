//! Configuration management for reelcat
//!
//! Handles config file loading/saving and environment overrides.
//! Config is stored at ~/.config/reelcat/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::catalog::{CatalogConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable overriding the catalog base URL
pub const ENV_API_URL: &str = "REELCAT_API_URL";

/// Environment variable overriding the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "REELCAT_TIMEOUT_SECS";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog service base URL
    pub api_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Sort listings newest first (default: true)
    pub sort_newest_first: Option<bool>,
    /// Validate next/previous episode links against the episode list
    pub strict_navigation: Option<bool>,
}

impl Config {
    /// Get config file path (~/.config/reelcat/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reelcat").join("config.toml"))
    }

    /// Load config from the default file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit file; unlike `load`, a bad file is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save config to the default file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Apply `REELCAT_*` environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api_url = Some(url);
            }
        }
        if let Some(secs) = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            self.timeout_secs = Some(secs);
        }
        self
    }

    /// Base URL with fallback to the built-in catalog
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn strict_navigation(&self) -> bool {
        self.strict_navigation.unwrap_or(false)
    }

    /// Connection settings for the catalog client
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.api_url().to_string(),
            timeout: self.timeout(),
            sort_newest_first: self.sort_newest_first.unwrap_or(true),
        }
    }
}
