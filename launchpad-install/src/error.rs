//! Error types for launchpad-install.

use thiserror::Error;

use launchpad_core::{InstallError, Phase, Step};

use crate::orchestrator::RunState;

/// A run stopped at its first failing step.
#[derive(Debug, Error)]
#[error("{phase} failed at step '{step}' (last completed state: {reached}): {source}")]
pub struct RunFailure {
    pub phase: Phase,
    pub step: Step,
    /// The last state the run reached before failing.
    pub reached: RunState,
    #[source]
    pub source: InstallError,
}
