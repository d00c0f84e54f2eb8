//! Configuration management for Lumen.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Lumen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model identity settings
    pub model: ModelConfig,

    /// Generation (sampling) parameters
    pub generation: GenerationConfig,

    /// Batch execution settings
    pub batch: BatchConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Model identity settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name passed through to the adapter, if any
    pub name: Option<String>,
}

/// Generation parameters forwarded to adapters as passive data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per response
    pub max_tokens: u32,

    /// Nucleus sampling cutoff
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,

    /// Maximum newly generated tokens
    pub max_new_tokens: u32,

    /// Device hint for local backends
    pub device: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 500,
            top_p: 1.0,
            top_k: 50,
            max_new_tokens: 500,
            device: "cuda".to_string(),
        }
    }
}

/// Batch execution settings for the runner's worker pool and retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum concurrent invocations
    pub max_workers: usize,

    /// Total attempts per invocation when retrying (initial call included)
    pub retry_attempts: u32,

    /// Base backoff delay between retries in milliseconds
    pub retry_delay_ms: u64,

    /// Per-invocation timeout in milliseconds
    pub invoke_timeout_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            invoke_timeout_ms: 60_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// ~/.lumen/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "lumen", "lumen")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".lumen").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.max_workers == 0 {
            return Err(ConfigError::ValidationError(
                "batch.max_workers must be > 0".into(),
            ));
        }
        if self.batch.retry_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "batch.retry_attempts must be > 0".into(),
            ));
        }
        if self.batch.invoke_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "batch.invoke_timeout_ms must be > 0".into(),
            ));
        }
        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.generation.top_p < 0.0 || self.generation.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "generation.top_p must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.batch.max_workers, 10);
        assert_eq!(config.batch.retry_attempts, 3);
        assert_eq!(config.generation.max_tokens, 500);
        assert!(config.model.name.is_none());
    }

    #[test]
    fn test_default_config_passes_validation() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml = Config::default().to_toml().unwrap();
        assert!(toml.contains("[generation]"));
        assert!(toml.contains("[batch]"));
    }

    #[test]
    fn test_validate_rejects_zero_max_workers() {
        let mut config = Config::default();
        config.batch.max_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_workers"));
    }

    #[test]
    fn test_validate_rejects_zero_retry_attempts() {
        let mut config = Config::default();
        config.batch.retry_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retry_attempts"));
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.generation.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\nmax_workers = 2").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.batch.max_workers, 2);
        // Unspecified sections fall back to defaults
        assert_eq!(config.batch.retry_attempts, 3);
        assert_eq!(config.generation.top_k, 50);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\nmax_workers = 0").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
