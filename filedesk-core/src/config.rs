use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Client configuration, read from ~/.filedesk/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL every endpoint path is appended to
    pub endpoint: String,
    /// Per-request timeout; absent means requests may hang indefinitely
    pub timeout_secs: Option<u64>,
    /// Accept invalid TLS certificates
    pub insecure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Where a successful login navigates to
    pub dashboard_path: String,
    /// Where a successful logout navigates to
    pub home_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            insecure: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dashboard_path: "/dashboard".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Join an endpoint path onto the configured base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

impl ClientConfig {
    /// Load config from ~/.filedesk/config.toml
    ///
    /// A missing file is not an error: every key has a default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self =
            toml::from_str(&content).context("Failed to parse config file (invalid TOML)")?;

        config.validate()?;
        Ok(config)
    }

    /// Get config file path: ~/.filedesk/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".filedesk/config.toml")
    }

    /// Serialize to TOML, used by `filedesk config init` and `config show`
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Check values that would otherwise only fail at the first request
    pub fn validate(&self) -> Result<()> {
        let endpoint = &self.server.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            anyhow::bail!(
                "server.endpoint must be an http(s) URL, got {:?}",
                endpoint
            );
        }
        for (key, path) in [
            ("ui.dashboard_path", &self.ui.dashboard_path),
            ("ui.home_path", &self.ui.home_path),
        ] {
            if !path.starts_with('/') {
                anyhow::bail!("{} must start with '/', got {:?}", key, path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server.timeout(), None);
        assert_eq!(config.ui.home_path, "/");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nendpoint = \"https://files.example.com/\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            config.server.url("/login"),
            "https://files.example.com/login"
        );
        assert_eq!(config.ui.dashboard_path, "/dashboard");
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nendpoint = \"ftp://example.com\"").unwrap();

        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("server.endpoint"));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = ClientConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
