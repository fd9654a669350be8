//! # launchpad-install
//!
//! The installation sequence. Call [`Installer::run`] to provision the app,
//! build the local checkout and deploy it; [`plan`] lists what a run would
//! do without doing it.

pub mod build;
pub mod deploy;
pub mod error;
pub mod orchestrator;
pub mod provision;
pub mod storage;

pub use build::LocalBuildDriver;
pub use deploy::DeployDriver;
pub use error::RunFailure;
pub use orchestrator::{plan, Installer, PlannedStep, RunReport, RunState};
pub use provision::RemoteProvisioner;
pub use storage::prepare_storage;
