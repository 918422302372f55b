//! Settings error types.

use std::path::PathBuf;

/// Result type alias for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading settings and selecting a profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested profile section is absent. `None` means the default `[gptman]` block.
    #[error("{}", no_such_profile_message(.0))]
    NoSuchProfile(Option<String>),

    /// No settings file exists at any candidate location.
    #[error("settings file not found (searched: {})", display_paths(.searched))]
    SettingsNotFound { searched: Vec<PathBuf> },

    /// Failed to read a settings file.
    #[error("failed to read settings file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Missing required field.
    #[error("missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// API key not found in the profile or the environment.
    #[error("API key not found for backend '{backend}'. Set api_key in the profile or the {env_var} env var")]
    ApiKeyNotFound { backend: String, env_var: String },
}

fn no_such_profile_message(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("Profile section [profile.{}] not found", name),
        None => "Default [gptman] section is not found".to_string(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_such_profile_messages() {
        let named = ConfigError::NoSuchProfile(Some("work".to_string()));
        assert_eq!(
            named.to_string(),
            "Profile section [profile.work] not found"
        );

        let default = ConfigError::NoSuchProfile(None);
        assert_eq!(default.to_string(), "Default [gptman] section is not found");
    }

    #[test]
    fn test_settings_not_found_lists_paths() {
        let err = ConfigError::SettingsNotFound {
            searched: vec![
                PathBuf::from("gptman.toml"),
                PathBuf::from("/home/u/.gptman.toml"),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("gptman.toml, /home/u/.gptman.toml"));
    }
}
