//! Launchpad core library — run configuration, add-on selection, artifact
//! synthesis, errors.
//!
//! - [`types`] — newtypes, [`InstallationConfig`], phases and steps
//! - [`error`] — [`InstallError`]
//! - [`addons`] — default / optional add-on sets
//! - [`env_file`] — environment file synthesis
//! - [`procfile`] — process declaration file
//! - [`config`] — optional YAML config file

pub mod addons;
pub mod config;
pub mod env_file;
pub mod error;
pub mod procfile;
pub mod types;

pub use env_file::{build_env_file, EnvFileContent};
pub use error::{ConfigFileError, InstallError};
pub use types::{
    AddonId, AppName, ConfigVarMap, InstallationConfig, Phase, RemoteAppHandle,
    StorageCredentials, Step,
};
