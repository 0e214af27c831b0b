//! Configuration for the agent playground.
//!
//! YAML files with `${VAR}` interpolation, defaults for every field, and
//! validation that reports every problem at once.

mod defaults;
mod env;
pub mod types;
mod validation;

use std::path::Path;

pub use env::interpolate_env;
pub use types::*;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing environment variables: {0:?}")]
    MissingEnvVars(Vec<String>),

    #[error("Invalid default document '{0}': {1}")]
    InvalidDefaultDocument(String, String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlaygroundConfig {
    /// Parse a configuration from a YAML string.
    /// Environment variables in the format `${VAR_NAME}` are interpolated first.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let interpolated = env::interpolate_env(yaml)?;
        if interpolated.trim().is_empty() {
            return Ok(PlaygroundConfig::default());
        }
        let config: PlaygroundConfig = serde_yaml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Load a configuration file. Relative paths inside it are anchored at the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.effective(base))
    }

    /// Render the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
