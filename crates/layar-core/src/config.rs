use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::LayarError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub playback: PlaybackConfig,
}

/// Upstream endpoints and credentials. Every field has a working
/// default, so the app runs with zero configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Scrape target for movies (and detail pages).
    pub lk21_url: String,
    /// Scrape target for series trending rows.
    pub nontondrama_url: String,
    /// Base URL of the community proxy catalog API.
    pub proxy_api_url: String,
    /// Optional credential pair forwarded to the proxy API as the
    /// X-RapidAPI-Key / X-RapidAPI-Host headers. Empty = not sent.
    pub api_key: String,
    pub api_host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Seconds an embed may stay silent before it counts as not
    /// responding. Third-party embeds are slow; 10s is the default.
    pub load_timeout_secs: u64,
    /// Advance to the next candidate automatically on failure instead
    /// of waiting for a manual server switch.
    pub auto_advance: bool,
}

impl AppConfig {
    /// Load config: user file (if it exists) over built-in defaults,
    /// then environment overrides on top of either.
    pub fn load() -> Result<Self, LayarError> {
        let mut config = Self::load_file()?;
        config.apply_env();
        Ok(config)
    }

    fn load_file() -> Result<Self, LayarError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)?;
            toml::from_str(&user_str).map_err(|e| LayarError::Config(e.to_string()))
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| LayarError::Config(e.to_string()))
        }
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("LK21_URL") {
            self.sources.lk21_url = v;
        }
        if let Ok(v) = std::env::var("ND_URL") {
            self.sources.nontondrama_url = v;
        }
        if let Ok(v) = std::env::var("LK21_API") {
            self.sources.proxy_api_url = v;
        }
        if let Ok(v) = std::env::var("LAYAR_API_KEY") {
            self.sources.api_key = v;
        }
        if let Ok(v) = std::env::var("LAYAR_API_HOST") {
            self.sources.api_host = v;
        }
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path of the persisted my-list file.
    pub fn mylist_path() -> PathBuf {
        project_dirs()
            .map(|d| d.data_dir().join("mylist.json"))
            .unwrap_or_else(|| PathBuf::from("mylist.json"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "layar")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.sources.lk21_url, "https://tv.lk21official.live");
        assert_eq!(config.sources.proxy_api_url, "https://lk21-api.vercel.app");
        assert!(config.sources.api_key.is_empty());
        assert_eq!(config.playback.load_timeout_secs, 10);
        assert!(!config.playback.auto_advance);
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.sources.lk21_url, config.sources.lk21_url);
        assert_eq!(
            deserialized.playback.load_timeout_secs,
            config.playback.load_timeout_secs
        );
    }
}
