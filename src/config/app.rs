// src/config/app.rs
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults::*;
use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use crate::error::Result;
use crate::random::GeneratorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manager: ManagerConfig,
    pub random: RandomConfig,
}

/// Slot table sizing and salt source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub initial_capacity: usize,
    /// Longer descriptions are rejected, never truncated
    pub max_description_len: usize,
    /// Must be a secure backend
    pub salt_generator: GeneratorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Backend used by `global::random_new_default`
    pub default_generator: GeneratorKind,
}

impl Default for Config {
    fn default() -> Self {
        default_config()
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        default_manager()
    }
}

impl Default for RandomConfig {
    fn default() -> Self {
        default_random()
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load config once — falls back to defaults if the file is missing
///
/// The path comes from `CTXV_CONFIG`, else `context-vault.toml` in the
/// working directory. A file that exists but does not parse is an error.
pub fn load() -> Result<&'static Config> {
    if let Some(conf) = CONFIG.get() {
        return Ok(conf);
    }

    let config_path =
        std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let conf = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        warn!(path = %config_path, "config file not found — using built-in defaults");
        default_config()
    };

    Ok(CONFIG.get_or_init(|| conf))
}
