//! API credential handling.
//!
//! The key is held in a [`SecretString`] so it never shows up in `Debug` or
//! `Display` output and is zeroed on drop. Call [`ApiCredential::expose`]
//! only where the value is sent.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Environment variable holding the OpenRouter API key.
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Config,
    Environment,
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
        }
    }

    /// Load from an environment variable. Unset or blank is an error.
    pub fn from_env(env_var: &str) -> Result<Self, ProviderError> {
        match std::env::var(env_var) {
            Ok(value) if !value.trim().is_empty() => {
                Ok(Self::new(value, CredentialSource::Environment))
            }
            _ => Err(ProviderError::NotConfigured(format!(
                "API key not set: configure '{}' environment variable",
                env_var
            ))),
        }
    }

    /// Use `configured` when given, falling back to `env_var`.
    pub fn from_config_or_env(
        configured: Option<&str>,
        env_var: &str,
    ) -> Result<Self, ProviderError> {
        match configured {
            Some(value) if !value.trim().is_empty() => {
                Ok(Self::new(value, CredentialSource::Config))
            }
            _ => Self::from_env(env_var),
        }
    }

    /// The raw value, for the request header only.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API key from {} [REDACTED]", self.source)
    }
}
