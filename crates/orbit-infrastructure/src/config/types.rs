//! Typed views over the merged configuration tree

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use orbit_domain::error::{Error, Result};

/// The `general` config section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Port the server binds
    #[serde(default = "default_port")]
    pub port: u16,
    /// Process-default inference provider
    #[serde(default)]
    pub inference_provider: Option<String>,
    /// Process-default timezone
    #[serde(default)]
    pub timezone: Option<String>,
    /// Admin auth settings
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_port() -> u16 {
    3000
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            inference_provider: None,
            timezone: None,
            auth: AuthConfig::default(),
        }
    }
}

impl GeneralConfig {
    /// Extract the typed `general` section from the merged tree
    pub fn from_config(config: &Value) -> Result<Self> {
        match config.get("general") {
            None => Ok(Self::default()),
            Some(section) => serde_json::from_value(section.clone())
                .map_err(|e| Error::config_with_source("invalid 'general' section", e)),
        }
    }
}

/// Admin bearer-token auth settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether admin endpoints require a bearer token
    #[serde(default)]
    pub enabled: bool,
    /// The accepted token (usually `${ORBIT_ADMIN_TOKEN}` in YAML)
    #[serde(default)]
    pub token: Option<String>,
}

/// Logging settings, read from the `general.logging` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON-formatted log lines
    #[serde(default)]
    pub json_format: bool,
    /// Optional log file path for daily-rotated file output
    #[serde(default)]
    pub file_output: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_format: false,
            file_output: None,
        }
    }
}

impl LoggingConfig {
    /// Extract the typed `general.logging` section from the merged tree
    pub fn from_config(config: &Value) -> Result<Self> {
        match config.pointer("/general/logging") {
            None => Ok(Self::default()),
            Some(section) => serde_json::from_value(section.clone())
                .map_err(|e| Error::config_with_source("invalid 'general.logging' section", e)),
        }
    }
}
