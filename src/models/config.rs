//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote provider endpoint and credential settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Batching and concurrency settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Output store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(AppError::validation(
                "provider.api_key is empty (set it in the config file or via STEAM_API_KEY)",
            ));
        }
        if self.provider.user_agent.trim().is_empty() {
            return Err(AppError::validation("provider.user_agent is empty"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(AppError::validation("provider.timeout_secs must be > 0"));
        }
        Url::parse(&self.provider.endpoint)
            .map_err(|e| AppError::validation(format!("provider.endpoint is not a URL: {e}")))?;
        if self.scheduler.requests_limit == 0 {
            return Err(AppError::validation("scheduler.requests_limit must be > 0"));
        }
        if self.scheduler.max_concurrent == 0 {
            return Err(AppError::validation("scheduler.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

/// Remote provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Package details endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Provider credential, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            api_key: String::new(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Batching and concurrency settings.
///
/// `requests_limit` is the provider's rate-limit batch size;
/// `max_concurrent` bounds parallel connections. The two are independent
/// knobs: a batch larger than the pool is still fetched, just not all at
/// once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Requests allowed per rate-limit window
    #[serde(default = "defaults::requests_limit")]
    pub requests_limit: usize,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Pause between batches in production mode, in seconds
    #[serde(default = "defaults::cooldown")]
    pub cooldown_secs: u64,

    /// Execution mode
    #[serde(default)]
    pub environment: Environment,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            requests_limit: defaults::requests_limit(),
            max_concurrent: defaults::max_concurrent(),
            cooldown_secs: defaults::cooldown(),
            environment: Environment::default(),
        }
    }
}

/// Execution mode for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Stop after the first batch instead of waiting out the rate limit.
    #[default]
    Development,
    /// Process every batch, sleeping the cool-down window between them.
    Production,
}

impl Environment {
    /// Parse from a config or environment string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" => Some(Environment::Development),
            "production" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Output store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path
    #[serde(default = "defaults::db_path")]
    pub db_path: PathBuf,

    /// Delete any existing database before the run
    #[serde(default)]
    pub reset_on_start: bool,

    /// Directory for CSV mirrors of the two relations, if set
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::db_path(),
            reset_on_start: false,
            export_dir: None,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Provider defaults
    pub fn endpoint() -> String {
        "https://store.steampowered.com/api/packagedetails/".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; steam-ingest/0.1)".into()
    }

    // Scheduler defaults: the provider allows 5 requests per 5 minutes
    pub fn requests_limit() -> usize {
        5
    }
    pub fn max_concurrent() -> usize {
        5
    }
    pub fn cooldown() -> u64 {
        300
    }

    // Storage defaults
    pub fn db_path() -> PathBuf {
        PathBuf::from("data/packages.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> Config {
        let mut config = Config::default();
        config.provider.api_key = "test-key".to_string();
        config
    }

    #[test]
    fn validate_accepts_defaults_with_key() {
        assert!(config_with_key().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let mut config = config_with_key();
        config.scheduler.requests_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = config_with_key();
        config.scheduler.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let mut config = config_with_key();
        config.provider.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn environment_parses_known_modes() {
        assert_eq!(
            Environment::parse("development"),
            Some(Environment::Development)
        );
        assert_eq!(
            Environment::parse("PRODUCTION"),
            Some(Environment::Production)
        );
        assert_eq!(Environment::parse("staging"), None);
    }

    #[test]
    fn toml_round_trip_keeps_environment() {
        let toml_str = r#"
            [scheduler]
            requests_limit = 10
            environment = "production"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scheduler.requests_limit, 10);
        assert_eq!(config.scheduler.environment, Environment::Production);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.scheduler.max_concurrent, 5);
        assert_eq!(config.provider.timeout_secs, 30);
    }
}
