//! Settings file discovery.
//!
//! Candidates are checked in order and the first existing file wins:
//! 1. `$GPTMAN_CONFIG`
//! 2. `./gptman.toml`
//! 3. `~/.gptman.toml`
//! 4. `<config dir>/gptman/gptman.toml`

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result, Settings};

/// Settings filename.
pub const SETTINGS_FILE: &str = "gptman.toml";

/// Environment variable naming an explicit settings file.
pub const SETTINGS_ENV: &str = "GPTMAN_CONFIG";

/// Environment variable overriding the gptman config directory.
const CONFIG_DIR_ENV: &str = "GPTMAN_CONFIG_DIR";

/// Application name for platform directory resolution.
const APP_NAME: &str = "gptman";

/// Get the gptman config directory.
///
/// Checks `GPTMAN_CONFIG_DIR` first, then falls back to the platform default
/// (`~/.config/gptman` on Linux). Log files live under this directory too.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Candidate settings paths for the current process, in priority order.
pub fn settings_candidates() -> Vec<PathBuf> {
    let explicit = std::env::var(SETTINGS_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    candidates_from(explicit, &cwd, dirs::home_dir(), config_dir())
}

fn candidates_from(
    explicit: Option<PathBuf>,
    cwd: &Path,
    home: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    candidates.extend(explicit);
    candidates.push(cwd.join(SETTINGS_FILE));
    candidates.extend(home.map(|h| h.join(format!(".{}", SETTINGS_FILE))));
    candidates.extend(config_dir.map(|d| d.join(SETTINGS_FILE)));
    candidates
}

/// Find and load the first existing settings file.
///
/// Returns the settings with the path they were read from.
pub fn discover_settings() -> Result<(Settings, PathBuf)> {
    load_first(settings_candidates())
}

fn load_first(candidates: Vec<PathBuf>) -> Result<(Settings, PathBuf)> {
    for path in &candidates {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading settings");
            let settings = load_settings_file(path)?;
            return Ok((settings, path.clone()));
        }
    }
    Err(ConfigError::SettingsNotFound {
        searched: candidates,
    })
}

/// Load settings from a specific file path (no discovery).
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Settings::from_toml(&contents)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_order() {
        let candidates = candidates_from(
            Some(PathBuf::from("/etc/explicit.toml")),
            Path::new("/work"),
            Some(PathBuf::from("/home/u")),
            Some(PathBuf::from("/home/u/.config/gptman")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/etc/explicit.toml"),
                PathBuf::from("/work/gptman.toml"),
                PathBuf::from("/home/u/.gptman.toml"),
                PathBuf::from("/home/u/.config/gptman/gptman.toml"),
            ]
        );
    }

    #[test]
    fn test_candidates_without_home() {
        let candidates = candidates_from(None, Path::new("/work"), None, None);
        assert_eq!(candidates, vec![PathBuf::from("/work/gptman.toml")]);
    }

    #[test]
    fn test_first_existing_file_wins() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(
            project.path().join(SETTINGS_FILE),
            "[gptman]\napi_key = \"project\"\n",
        )
        .unwrap();
        fs::write(
            home.path().join(".gptman.toml"),
            "[gptman]\napi_key = \"home\"\n",
        )
        .unwrap();

        let candidates =
            candidates_from(None, project.path(), Some(home.path().to_path_buf()), None);
        let (settings, path) = load_first(candidates).unwrap();
        assert_eq!(path, project.path().join(SETTINGS_FILE));
        assert_eq!(settings.gptman.unwrap().api_key.as_deref(), Some("project"));
    }

    #[test]
    fn test_falls_through_to_later_candidate() {
        let project = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join(".gptman.toml"),
            "[profile.work]\nbackend = \"azure\"\n",
        )
        .unwrap();

        let candidates =
            candidates_from(None, project.path(), Some(home.path().to_path_buf()), None);
        let (settings, path) = load_first(candidates).unwrap();
        assert_eq!(path, home.path().join(".gptman.toml"));
        assert!(settings.profile.contains_key("work"));
    }

    #[test]
    fn test_no_settings_file() {
        let project = TempDir::new().unwrap();
        let candidates = candidates_from(None, project.path(), None, None);
        let err = load_first(candidates).unwrap_err();
        match err {
            ConfigError::SettingsNotFound { searched } => {
                assert_eq!(searched, vec![project.path().join(SETTINGS_FILE)]);
            }
            other => panic!("expected SettingsNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_settings_file_not_found() {
        let err = load_settings_file(Path::new("/nonexistent/gptman.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_settings_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
