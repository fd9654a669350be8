//! Error types for launchpad-local.

use std::path::PathBuf;

use thiserror::Error;

/// Failures starting a process or writing an artifact.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (not on `PATH`, not executable).
    #[error("cannot start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`ProcessError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ProcessError {
    ProcessError::Io {
        path: path.into(),
        source,
    }
}
