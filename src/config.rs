// src/config.rs

//! Configuration loading utilities.
//!
//! Settings come from a TOML file, with the secret credential and a few
//! operational knobs overridable through `.env` / process environment
//! variables (`STEAM_API_KEY`, `REQUESTS_LIMIT`, `ENVIRONMENT`, `DB_PATH`).

use std::env;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, Environment};

/// Load configuration from a TOML file, apply environment overrides and
/// validate the result.
///
/// A missing or broken config file falls back to defaults (the credential
/// still has to arrive through the environment for validation to pass).
pub fn load(path: &Path) -> Result<Config> {
    // Pull a local .env into the process environment first, if present.
    dotenvy::dotenv().ok();

    let mut config = Config::load_or_default(path);
    apply_overrides(&mut config, |key| env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Apply environment overrides from an arbitrary variable source.
fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(key) = var("STEAM_API_KEY") {
        config.provider.api_key = key;
    }
    if let Some(limit) = var("REQUESTS_LIMIT") {
        config.scheduler.requests_limit = limit
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("REQUESTS_LIMIT is not a number: {limit}")))?;
    }
    if let Some(mode) = var("ENVIRONMENT") {
        config.scheduler.environment = Environment::parse(&mode)
            .ok_or_else(|| AppError::config(format!("unknown ENVIRONMENT: {mode}")))?;
    }
    if let Some(db_path) = var("DB_PATH") {
        config.storage.db_path = db_path.into();
    }
    Ok(())
}
