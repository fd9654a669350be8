//! Optional YAML config file with per-operator defaults.
//!
//! Every field is optional; command-line flags take precedence over file
//! values. The file never holds the app name.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigFileError;

/// File name looked up in the home directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".launchpad.yaml";

/// On-disk shape of `~/.launchpad.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailchimp_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<String>,
    #[serde(default)]
    pub all: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<String>,
}

/// Default config path under `home`.
pub fn default_path_at(home: &Path) -> PathBuf {
    home.join(DEFAULT_CONFIG_FILE)
}

/// Load a config file, failing if it does not exist.
pub fn load(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // An empty file deserializes as unit, not as a mapping.
    if raw.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    let file = serde_yaml::from_str(&raw).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(file)
}

/// Load a config file if present; a missing file yields defaults.
pub fn load_or_default(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    match load(path) {
        Err(ConfigFileError::NotFound { .. }) => Ok(ConfigFile::default()),
        other => other,
    }
}
