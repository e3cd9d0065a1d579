//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the primary service origin, an optional analytics origin, the
//! token storage backend and the last used login email.
//!
//! Configuration is stored at `~/.config/marketdeck/config.json`. The
//! `MARKETDECK_API_URL` and `MARKETDECK_ANALYTICS_URL` environment variables
//! take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "marketdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Primary service origin used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Port segment of the primary service inside the origin string
const PRIMARY_PORT: &str = "8080";

/// Port segment of the analytics service
const ANALYTICS_PORT: &str = "8086";

pub const API_URL_ENV: &str = "MARKETDECK_API_URL";
pub const ANALYTICS_URL_ENV: &str = "MARKETDECK_ANALYTICS_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub analytics_url: Option<String>,
    #[serde(default)]
    pub token_storage: TokenStorage,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Read the config file alone, without environment overrides.
    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Persist the last used login email.
    ///
    /// Only that field is written back: origins passed on the command line or
    /// through the environment stay one-off.
    pub fn remember_email(email: &str) -> Result<()> {
        Self::remember_email_at(&Self::config_path()?, email)
    }

    fn remember_email_at(path: &Path, email: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        stored.last_email = Some(email.to_string());
        stored.save_to(path)
    }

    /// Environment variables override whatever the config file says.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(url) = non_empty(API_URL_ENV) {
            self.api_url = Some(url);
        }
        if let Some(url) = non_empty(ANALYTICS_URL_ENV) {
            self.analytics_url = Some(url);
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn origins(&self) -> ServiceOrigins {
        let primary = self
            .api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        match self.analytics_url {
            Some(ref analytics) => ServiceOrigins::new(primary, analytics.clone()),
            None => ServiceOrigins::from_primary(primary),
        }
    }
}

/// Base origins of the two backend services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOrigins {
    pub primary: String,
    pub analytics: String,
}

impl ServiceOrigins {
    pub fn new(primary: impl Into<String>, analytics: impl Into<String>) -> Self {
        Self {
            primary: trim_origin(primary.into()),
            analytics: trim_origin(analytics.into()),
        }
    }

    /// Derive the analytics origin from the primary one.
    pub fn from_primary(primary: impl Into<String>) -> Self {
        let primary = primary.into();
        let analytics = derive_analytics_origin(&primary);
        Self::new(primary, analytics)
    }
}

impl Default for ServiceOrigins {
    fn default() -> Self {
        Self::from_primary(DEFAULT_API_URL)
    }
}

/// Swap the primary service port for the analytics port.
///
/// This is a plain substring replacement of the first `8080` in the origin,
/// not URL parsing: an origin without that substring is returned unchanged.
pub fn derive_analytics_origin(primary: &str) -> String {
    primary.replacen(PRIMARY_PORT, ANALYTICS_PORT, 1)
}

fn trim_origin(origin: String) -> String {
    origin.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_derive_analytics_origin_swaps_port() {
        assert_eq!(
            derive_analytics_origin("http://localhost:8080"),
            "http://localhost:8086"
        );
    }

    #[test]
    fn test_derive_analytics_origin_only_first_occurrence() {
        assert_eq!(
            derive_analytics_origin("http://host8080.internal:8080"),
            "http://host8086.internal:8080"
        );
    }

    #[test]
    fn test_derive_analytics_origin_without_port_is_unchanged() {
        assert_eq!(
            derive_analytics_origin("https://api.example.com"),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_origins_prefer_explicit_analytics_url() {
        let config = Config {
            api_url: Some("http://localhost:8080/".to_string()),
            analytics_url: Some("http://analytics:9000".to_string()),
            ..Default::default()
        };
        let origins = config.origins();
        assert_eq!(origins.primary, "http://localhost:8080");
        assert_eq!(origins.analytics, "http://analytics:9000");
    }

    #[test]
    fn test_default_origins() {
        let origins = Config::default().origins();
        assert_eq!(origins.primary, "http://localhost:8080");
        assert_eq!(origins.analytics, "http://localhost:8086");
    }

    fn env(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key: &str| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            api_url: Some("http://file:8080".to_string()),
            ..Default::default()
        };
        config.apply_env_with(env(&[
            (API_URL_ENV, " https://api.example.com:8080 "),
            (ANALYTICS_URL_ENV, "https://stats.example.com"),
        ]));
        let origins = config.origins();
        assert_eq!(origins.primary, "https://api.example.com:8080");
        assert_eq!(origins.analytics, "https://stats.example.com");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config {
            api_url: Some("http://file:8080".to_string()),
            ..Default::default()
        };
        config.apply_env_with(env(&[(API_URL_ENV, "  "), (ANALYTICS_URL_ENV, "")]));
        assert_eq!(config.api_url.as_deref(), Some("http://file:8080"));
        assert_eq!(config.analytics_url, None);
        assert_eq!(config.origins().analytics, "http://file:8086");
    }

    #[test]
    fn test_primary_env_alone_derives_analytics() {
        let mut config = Config::default();
        config.apply_env_with(env(&[(API_URL_ENV, "http://staging:8080")]));
        assert_eq!(config.origins().analytics, "http://staging:8086");
    }

    #[test]
    fn test_remember_email_keeps_stored_origins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marketdeck").join(CONFIG_FILE);
        let stored = Config {
            api_url: Some("http://saved:8080".to_string()),
            token_storage: TokenStorage::Keyring,
            ..Default::default()
        };
        stored.save_to(&path).unwrap();

        Config::remember_email_at(&path, "ana@example.com").unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api_url.as_deref(), Some("http://saved:8080"));
        assert_eq!(reloaded.analytics_url, None);
        assert_eq!(reloaded.token_storage, TokenStorage::Keyring);
        assert_eq!(reloaded.last_email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_remember_email_without_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        Config::remember_email_at(&path, "ana@example.com").unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api_url, None);
        assert_eq!(reloaded.last_email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_token_storage_serde() {
        let config: Config = serde_json::from_str(r#"{"token_storage": "keyring"}"#).unwrap();
        assert_eq!(config.token_storage, TokenStorage::Keyring);
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.token_storage, TokenStorage::File);
    }
}
