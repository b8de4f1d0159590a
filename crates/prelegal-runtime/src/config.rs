//! Runtime configuration.
//!
//! Loaded from YAML. Durations use humantime syntax (`"30s"`, `"1h"`).
//!
//! ```yaml
//! model: openai/gpt-oss-120b
//! max_tokens: 2000
//! timeout: 45s
//! cache:
//!   max_entries: 1000
//!   ttl: 1h
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Chat model identifier
    pub model: String,

    /// Maximum tokens per reply
    pub max_tokens: u32,

    pub temperature: f32,

    /// Per-request timeout
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Retries on rate limiting before giving up
    pub max_retries: usize,

    /// Upstream routing preference, tried in order
    pub provider_order: Vec<String>,

    /// OpenAI-compatible API root
    pub base_url: String,

    pub cache: CacheConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 2000,
            temperature: 0.2,
            timeout: Duration::from_secs(45),
            max_retries: 2,
            provider_order: vec!["cerebras".to_string()],
            base_url: DEFAULT_BASE_URL.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: u64,
    #[serde(with = "humantime_duration")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl RuntimeConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be positive".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Per-request settings handed to the provider.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            json_response: true,
            provider_order: self.provider_order.clone(),
        }
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.model, "openai/gpt-oss-120b");
        assert_eq!(config.provider_order, vec!["cerebras"]);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_from_yaml_with_durations() {
        let config = RuntimeConfig::from_yaml(
            r#"
model: openai/gpt-oss-20b
timeout: 1m 30s
cache:
  max_entries: 50
  ttl: 10m
"#,
        )
        .unwrap();

        assert_eq!(config.model, "openai/gpt-oss-20b");
        assert_eq!(config.timeout, Duration::from_secs(90));
        assert_eq!(config.cache.max_entries, 50);
        assert_eq!(config.cache.ttl, Duration::from_secs(600));
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_bad_duration_is_rejected() {
        let result = RuntimeConfig::from_yaml("timeout: soon");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            RuntimeConfig::from_yaml("model: ''"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_yaml("temperature: 5.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_completion_config() {
        let completion = RuntimeConfig::default().completion_config();
        assert!(completion.json_response);
        assert_eq!(completion.timeout, Duration::from_secs(45));
    }
}
