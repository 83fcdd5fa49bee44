use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use fleet_client::DEFAULT_BASE_URL;
use fleet_core::Priority;

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "FLEETCTL_BASE_URL";

/// CLI configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Fleet service base URL, including any path prefix such as `/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every request to the fleet service
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Priority for `queue` lines that leave it out
    #[serde(default = "default_priority")]
    pub default_priority: Priority,

    /// Dispatch still-queued tasks when the session ends normally
    #[serde(default = "default_drain_on_exit")]
    pub drain_on_exit: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_priority() -> Priority {
    5
}

fn default_drain_on_exit() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
            default_priority: default_priority(),
            drain_on_exit: default_drain_on_exit(),
        }
    }
}

impl CliConfig {
    /// Return the default config file path: ~/.config/fleetctl/config.toml
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fleetctl").join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// defaults; nothing is written to disk.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_config_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!(?config_path, "Loading config");
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
        Ok(config)
    }

    /// Resolve the fleet service URL.
    /// Priority: cli_override > env var > config file.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        self.resolve_base_url_with(cli_override, std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_base_url_with(&self, cli_override: Option<&str>, env_value: Option<String>) -> String {
        if let Some(url) = cli_override {
            return url.to_string();
        }
        if let Some(url) = env_value.filter(|v| !v.trim().is_empty()) {
            return url;
        }
        self.base_url.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
