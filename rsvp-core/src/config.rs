//! Global rsvp configuration.

use std::path::PathBuf;

use config::{Config, File};
use serde::Deserialize;

use crate::error::{RsvpError, RsvpResult};

static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/api";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Global configuration at ~/.config/rsvp/config.toml
///
/// Read-only: the commented-out template written by
/// [`RsvpConfig::create_default_config`] is the only thing we ever put
/// on disk. The session file lives next to it and is managed by
/// [`crate::session::FileSessionStore`], not by this struct.
#[derive(Deserialize, Clone)]
pub struct RsvpConfig {
    /// Base URL of the events API, including any path prefix.
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

impl RsvpConfig {
    pub fn config_path() -> RsvpResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RsvpError::Config("Could not determine config directory".into()))?
            .join("rsvp");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config, falling back to defaults when no file exists.
    pub fn load() -> RsvpResult<Self> {
        let config_path = Self::config_path()?;

        let config: RsvpConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .build()
            .map_err(|e| RsvpError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RsvpError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Base URL of the API with any trailing slash trimmed.
    pub fn api_base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &std::path::Path) -> RsvpResult<()> {
        let contents = format!(
            "\
# rsvp configuration

# Base URL of the events server:
# server_url = \"{}\"
",
            DEFAULT_SERVER_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RsvpError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RsvpError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let config: RsvpConfig = toml::from_str("").unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn server_url_is_overridable() {
        let config: RsvpConfig =
            toml::from_str("server_url = \"https://events.example.net/api\"").unwrap();
        assert_eq!(config.server_url, "https://events.example.net/api");
    }

    #[test]
    fn api_base_trims_trailing_slash() {
        let config: RsvpConfig =
            toml::from_str("server_url = \"https://events.example.net/api/\"").unwrap();
        assert_eq!(config.api_base(), "https://events.example.net/api");
    }

    #[test]
    fn default_config_template_is_commented_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        RsvpConfig::create_default_config(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# server_url"));

        let parsed: RsvpConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.server_url, DEFAULT_SERVER_URL);
    }
}
