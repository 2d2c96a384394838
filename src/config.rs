use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::github::DEFAULT_API_URL;

/// Name of the optional config file looked up in the current directory.
pub const CONFIG_FILE: &str = ".merged-prs.toml";

/// Environment variable that overrides `github.api_url`.
pub const API_URL_ENV: &str = "GITHUB_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .merged-prs.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API root, e.g. for GitHub Enterprise
    pub api_url: String,
    /// Sent as User-Agent on every request (GitHub rejects requests without one)
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: concat!("merged-prs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load configuration from .merged-prs.toml in the current directory,
    /// falling back to defaults when the file doesn't exist, then apply
    /// the GITHUB_API_URL override.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            config.apply_api_url_override(api_url);
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    fn apply_api_url_override(&mut self, api_url: String) {
        if !api_url.trim().is_empty() {
            self.github.api_url = api_url;
        }
    }
}
