//! Settings file schema and profile selection.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Default Azure OpenAI API version.
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Default time budget for waiting on a run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Parsed settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Default profile (`[gptman]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gptman: Option<Profile>,

    /// Named profiles (`[profile.NAME]`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profile: BTreeMap<String, Profile>,
}

impl Settings {
    /// Parse settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Select a named profile, or the default block when `name` is `None`.
    pub fn select_profile(&self, name: Option<&str>) -> Result<&Profile> {
        match name {
            Some(name) => self
                .profile
                .get(name)
                .ok_or_else(|| ConfigError::NoSuchProfile(Some(name.to_string()))),
            None => self.gptman.as_ref().ok_or(ConfigError::NoSuchProfile(None)),
        }
    }
}

/// Supported API providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Openai,
    Azure,
}

impl Backend {
    /// Environment variable consulted when a profile has no `api_key`.
    pub fn env_var(&self) -> &'static str {
        match self {
            Backend::Openai => "OPENAI_API_KEY",
            Backend::Azure => "AZURE_OPENAI_API_KEY",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::Openai => "OpenAI",
            Backend::Azure => "Azure OpenAI",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Connection settings for one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override of the API root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Seconds to wait for a run to complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Deployment used as the model when a prompt file names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_deployment: Option<String>,
}

impl Profile {
    /// Resolve the API key from the profile, then the backend's env var.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|var| std::env::var(var).ok())
    }

    /// Resolve the API key with a custom environment lookup.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        let env_var = self.backend.env_var();
        if let Some(key) = lookup(env_var).filter(|k| !k.is_empty()) {
            tracing::debug!(env_var, "API key resolved from environment");
            return Ok(key);
        }

        Err(ConfigError::ApiKeyNotFound {
            backend: self.backend.to_string(),
            env_var: env_var.to_string(),
        })
    }

    /// Azure endpoint, required for the azure backend.
    pub fn require_azure_endpoint(&self) -> Result<&str> {
        self.azure_endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: "azure_endpoint".to_string(),
                context: "azure profile".to_string(),
            })
    }

    /// Azure API version, falling back to [`DEFAULT_API_VERSION`].
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or(DEFAULT_API_VERSION)
    }

    /// Run-poll timeout, falling back to [`DEFAULT_TIMEOUT_SECS`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
