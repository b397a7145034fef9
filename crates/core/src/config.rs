//! Guard configuration
//!
//! Loaded from `rowguard.toml` (or an explicit file) with `ROWGUARD__*`
//! environment overrides on top of the built-in defaults.

use crate::access::identity::UserId;
use crate::access::permissions::{PERMISSION_DENIED, PERMISSION_DENIED_MESSAGE};
use crate::validation::{ValidateConfig, validators};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main guard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// How denials are reported
    #[serde(default)]
    pub denial: DenialConfig,
    /// Callers allowed on every object without consulting grants
    #[serde(default)]
    pub superusers: Vec<UserId>,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Denial reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenialConfig {
    /// Error code carried by every denial
    #[serde(default = "default_denial_code")]
    pub code: i32,
    /// Message template; `{}` is replaced by the business type name
    #[serde(default = "default_denial_message")]
    pub message: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_denial_code() -> i32 {
    PERMISSION_DENIED
}

fn default_denial_message() -> String {
    PERMISSION_DENIED_MESSAGE.to_string()
}

impl Default for DenialConfig {
    fn default() -> Self {
        Self {
            code: default_denial_code(),
            message: default_denial_message(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            denial: DenialConfig::default(),
            superusers: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl GuardConfig {
    /// Load configuration from environment and files in common locations
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let config_paths = ["rowguard.toml", "config/rowguard.toml", "/etc/rowguard/rowguard.toml"];
        for path in &config_paths {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path).required(false));
            }
        }

        let config: Self = builder
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific config file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("ROWGUARD")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("superusers")
}

impl ValidateConfig for GuardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        validators::validate_range(self.denial.code, 1, i32::MAX, "denial.code")?;
        validators::validate_not_empty(&self.denial.message, "denial.message")?;
        validators::validate_contains(&self.denial.message, "{}", "denial.message")?;
        validators::validate_not_empty(&self.log_level, "log_level")?;
        Ok(())
    }
}
