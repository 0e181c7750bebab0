//! User preferences persisted under `<data dir>/config/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::utils;
use crate::currency::LocaleConfig;
use crate::domain::BranchFilter;
use crate::errors::SchoolError;
use crate::utils::persistence::{read_json, write_json_atomic};

/// Seed used when no configuration exists yet.
pub const DEFAULT_SEED: u64 = 20_240_301;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Storage(#[from] SchoolError),
    #[error("Unknown setting `{0}`")]
    UnknownKey(String),
    #[error("Invalid value for `{key}`: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Seed for the generated school; the same seed replays the same data.
    #[serde(default = "Config::default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub default_branch: BranchFilter,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            seed: DEFAULT_SEED,
            default_branch: BranchFilter::All,
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 5] =
        ["locale", "currency", "seed", "default_branch", "color"];

    fn default_seed() -> u64 {
        DEFAULT_SEED
    }

    fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }

    /// Current value of a setting, rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        Ok(match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "seed" => self.seed.to_string(),
            "default_branch" => self.default_branch.to_string(),
            "color" => self.ui_color_enabled.to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        })
    }

    /// Parses and applies a single `key=value` change.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => {
                if !matches!(value, "pt-BR" | "en-US") {
                    return Err(ConfigError::InvalidValue {
                        key: "locale",
                        value: value.to_string(),
                    });
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err(ConfigError::InvalidValue {
                        key: "currency",
                        value: value.to_string(),
                    });
                }
                self.currency = value.to_ascii_uppercase();
            }
            "seed" => {
                self.seed = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "seed",
                    value: value.to_string(),
                })?;
            }
            "default_branch" => self.default_branch = BranchFilter::parse(value),
            "color" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: "color",
                            value: value.to_string(),
                        })
                    }
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at the application data directory.
    pub fn new() -> Self {
        Self {
            path: utils::config_file(),
        }
    }

    /// Manager rooted at an explicit data directory.
    pub fn with_base_dir(base: impl AsRef<Path>) -> Self {
        Self {
            path: base.as_ref().join("config").join("config.json"),
        }
    }

    /// Loads the stored configuration, or the defaults when none is stored.
    pub fn load(&self) -> Result<Config, ConfigError> {
        Ok(read_json::<Config>(&self.path)?.unwrap_or_default())
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        write_json_atomic(&self.path, config)?;
        tracing::debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
