//! Configuration types for the Karat console.
//!
//! Configuration is read from a single YAML file (`karat.yaml` by default) and
//! then overridden from the environment:
//!
//! - **KARAT_API_URL**: base URL of the production API
//! - **KARAT_SESSION_FILE**: path of the persisted session file
//!
//! Every field has a default, so running without a file is valid.

pub mod api;
pub mod dashboard;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, DEFAULT_API_URL};
pub use dashboard::DashboardConfig;
pub use session::SessionConfig;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "KARAT_API_URL";

/// Environment variable overriding `session.path`.
pub const SESSION_FILE_ENV: &str = "KARAT_SESSION_FILE";

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "karat.yaml";

/// Complete Karat configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KaratConfig {
    /// Remote production API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Persisted session location.
    #[serde(default)]
    pub session: SessionConfig,

    /// Local console server.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KaratConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration the way the binaries do.
    ///
    /// An explicit path must exist. Without one, `karat.yaml` in the working
    /// directory is used when present, otherwise defaults. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(path) = lookup(SESSION_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            self.session.path = Some(PathBuf::from(path.trim()));
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        Ok(())
    }
}
