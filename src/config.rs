//! Client configuration module.
//!
//! Handles loading and validating `vaultgal.toml`. The config is sparse:
//! every key has a stock default, and a missing file is the same as an
//! empty one. Unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! service_url = "http://localhost:8787"  # Storage service base URL
//! # identity = "alice"                   # Identity principal (or --identity)
//! ffmpeg_bin = "ffmpeg"                  # Binary used to sample video frames
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Client configuration loaded from `vaultgal.toml`.
///
/// All fields have sensible defaults. A config file need only specify the
/// values it wants to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the storage service.
    pub service_url: String,
    /// Identity principal presented to the storage service. When absent,
    /// the client runs anonymously and writes are refused.
    pub identity: Option<String>,
    /// Binary invoked to sample video frames for thumbnails.
    pub ffmpeg_bin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            identity: None,
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }
}

fn default_service_url() -> String {
    "http://localhost:8787".to_string()
}

impl ClientConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "service_url must start with http:// or https://".into(),
            ));
        }
        if self.ffmpeg_bin.is_empty() {
            return Err(ConfigError::Validation("ffmpeg_bin must not be empty".into()));
        }
        Ok(())
    }
}

/// Load the config file at `path`, falling back to stock defaults when the
/// file does not exist.
pub fn load(path: &Path) -> Result<ClientConfig, ConfigError> {
    let config = if path.exists() {
        toml::from_str(&fs::read_to_string(path)?)?
    } else {
        ClientConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A documented stock `vaultgal.toml`, printed by the `gen-config` command.
pub fn stock_config_toml() -> &'static str {
    r##"# vaultgal Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Base URL of the storage service. Every operation is POSTed to
# <service_url>/api/<operation>.
service_url = "http://localhost:8787"

# Identity principal presented to the storage service (x-identity header).
# Without one the client runs anonymously and every write is refused.
# Can also be passed per invocation with --identity.
#identity = "alice"

# Binary used to sample the 1-second frame for video thumbnails.
ffmpeg_bin = "ffmpeg"
"##
}
