//! Settings for gptman.
//!
//! Settings live in a single TOML file found by [`discover_settings`]. The
//! `[gptman]` table is the default profile; named profiles live under
//! `[profile.NAME]`:
//!
//! ```toml
//! [gptman]
//! api_key = "sk-..."
//!
//! [profile.work]
//! backend = "azure"
//! azure_endpoint = "https://example.openai.azure.com"
//! azure_deployment = "gpt-4o"
//! ```

pub mod discovery;
pub mod error;
pub mod settings;

pub use discovery::{
    SETTINGS_ENV, SETTINGS_FILE, config_dir, discover_settings, load_settings_file,
    settings_candidates,
};
pub use error::{ConfigError, Result};
pub use settings::{Backend, DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS, Profile, Settings};
