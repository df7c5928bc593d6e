use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Environment variable consulted once at load time; it overrides the key
/// stored on disk so CI and tests never have to write a config file.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

/// Top-level configuration stored on disk.
///
/// The key is resolved here, once, and handed to the provider explicitly.
/// Nothing else in the crate reads the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com credential. Absence is not an error: every network
    /// operation degrades to the sample fallback instead.
    pub api_key: Option<String>,
}

impl Config {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self { api_key: Some(api_key.into()) }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Load config from disk, or return an empty default if it doesn't
    /// exist yet. The `WEATHERAPI_KEY` environment variable, when set,
    /// wins over the stored key.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from_disk()?;
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => cfg.api_key = Some(key),
            _ => {}
        }
        Ok(cfg)
    }

    fn load_from_disk() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
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
        let dirs = ProjectDirs::from("app", "moonsense", "moonsense")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_has_no_key() {
        let cfg = Config::default();
        assert!(!cfg.has_api_key());
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = Config::with_api_key("");
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn set_and_read_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        assert_eq!(cfg.api_key(), Some("KEY"));
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config::with_api_key("SECRET");
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back.api_key(), Some("SECRET"));
    }
}
