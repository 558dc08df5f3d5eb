//! TOML-based startup configuration.
//!
//! Holds the initial timer [`Settings`] and the log level. The file is only
//! read: edits made during a session live in memory and die with it.
//!
//! Configuration is looked up at `$POMOTIMER_CONFIG`, falling back to
//! `<config_dir>/pomotimer/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{config_dir, CONFIG_ENV};
use crate::error::ConfigError;
use crate::timer::Settings;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: Settings,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// `$POMOTIMER_CONFIG` if set, otherwise the per-user config file.
    pub fn default_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => config_dir().join("config.toml"),
        }
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loading configuration");
                Self::from_toml_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse configuration text. Out-of-range timer values are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut cfg: Config = toml::from_str(content)?;
        if let Err(e) = cfg.timer.validate() {
            warn!("{e}; clamping timer settings");
            cfg.timer = cfg.timer.clamped();
        }
        Ok(cfg)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
