//! Client configuration.
//!
//! Loaded from a TOML file under the platform config directory. Every
//! field has a default so a missing file yields a usable configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback service URL when neither the config file nor the environment
/// provides one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the conversation service.
    pub server_url: String,
    /// Name shown in the default header greeting.
    pub display_name: String,
    /// Optional tracing filter, e.g. "natter=debug".
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            display_name: "friend".to_string(),
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Default config file location: `<config dir>/natter/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("natter").join("config.toml"))
    }

    /// Loads the configuration from `path`. A missing file is not an
    /// error; it yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.display_name, "friend");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "server_url = \"http://example.test:9000\"").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server_url, "http://example.test:9000");
        assert_eq!(config.display_name, "friend");
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server_url = [not toml").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
