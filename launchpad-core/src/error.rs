//! Error types for launchpad-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Step;

/// Every way an installation run can stop.
///
/// No variant is retried; the first one raised ends the run.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Operator input failed validation before any step ran.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The platform rejected the API credentials.
    #[error("platform rejected credentials: {0}")]
    RemoteAuth(String),

    /// The app name is already taken on the platform.
    #[error("app name '{name}' is already taken")]
    RemoteConflict { name: String },

    /// A remote call outside the named kinds failed.
    #[error("platform call '{operation}' failed: {reason}")]
    Remote {
        operation: &'static str,
        reason: String,
    },

    /// An add-on could not be attached; later add-ons were not attempted.
    #[error("failed to install add-on '{addon}': {reason}")]
    AddonInstall { addon: String, reason: String },

    /// The asset bucket could not be created.
    #[error("failed to create bucket '{bucket}': {reason}")]
    StorageProvision { bucket: String, reason: String },

    /// A config var needed for the environment file is missing or malformed.
    #[error("cannot parse config var '{key}': {reason}")]
    ConfigParse { key: String, reason: String },

    /// A local process exited non-zero or could not be started.
    #[error("local step '{step}' failed: {reason}")]
    LocalStepFailed { step: Step, reason: String },

    /// Pushing to the platform failed.
    #[error("deploy failed: {reason}")]
    DeployFailed { reason: String },

    /// Writing a local artifact failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`InstallError::Io`].
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> InstallError {
    InstallError::Io {
        path: path.into(),
        source,
    }
}

/// Errors raised while reading the optional YAML config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the file path for context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
