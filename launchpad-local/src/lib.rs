//! # launchpad-local
//!
//! Local side effects: running external tools through [`ProcessRunner`] and
//! writing artifacts with [`atomic_write`].

pub mod error;
pub mod runner;
pub mod writer;

pub use error::ProcessError;
pub use runner::{ExitStatus, LocalCommand, ProcessRunner, SystemRunner};
pub use writer::atomic_write;
