//! Configuration for the duke client.
//!
//! Stored as JSON at `<config dir>/duke/config.json`. Every field has a
//! default, so a partial (or missing) file is valid.

use crate::controller::DEFAULT_FALLBACK_REPLY;
use crate::conversation::DEFAULT_GREETING;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides [`Config::endpoint`].
pub const ENDPOINT_ENV: &str = "DUKE_ENDPOINT";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Chat endpoint that receives `POST {"message": ...}`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name shown in the header and thinking indicator.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// First bot message of every conversation.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Bot message appended when a reply request fails.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Background context forwarded with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Per-request timeout in seconds. Unset means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    "http://localhost:8000/chat".into()
}

fn default_assistant_name() -> String {
    "Duke".into()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.into()
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            assistant_name: default_assistant_name(),
            greeting: default_greeting(),
            fallback_reply: default_fallback_reply(),
            context: None,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default location of the config file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("duke").join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Apply environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_endpoint_override(std::env::var(ENDPOINT_ENV).ok())
    }

    /// Replace the endpoint if `endpoint` is set and non-empty.
    #[must_use]
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        self
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The platform has no config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}
