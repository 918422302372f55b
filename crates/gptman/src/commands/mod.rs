//! CLI command handlers.

pub mod assistant;

use anyhow::{Context as _, Result};
use gptman_client::GptmanClient;
use gptman_config::{Backend, Profile};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Profile name from `--profile` or `GPTMAN_PROFILE`.
    pub profile: Option<String>,
}

/// A client together with the profile it was built from.
pub struct Connection {
    pub client: GptmanClient,
    pub profile: Profile,
}

impl Context {
    /// Load settings, select the profile and build a client for it.
    pub fn connect(&self) -> Result<Connection> {
        let (settings, path) = gptman_config::discover_settings()?;
        tracing::debug!(
            path = %path.display(),
            profile = ?self.profile,
            "loaded settings"
        );

        let profile = settings.select_profile(self.profile.as_deref())?.clone();
        let client = build_client(&profile)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        Ok(Connection { client, profile })
    }
}

/// Build a client for one settings profile.
pub fn build_client(profile: &Profile) -> Result<GptmanClient> {
    let api_key = profile.resolve_api_key()?;

    let mut builder = match profile.backend {
        Backend::Openai => GptmanClient::builder().openai(api_key),
        Backend::Azure => GptmanClient::builder()
            .azure(profile.require_azure_endpoint()?, api_key)
            .api_version(profile.api_version()),
    };
    if let Some(base_url) = &profile.base_url {
        builder = builder.base_url(base_url.as_str());
    }

    Ok(builder.build()?)
}
