//! Local checkout, build and commit.
//!
//! Each method is one step. A non-zero exit aborts the run; nothing already
//! created on disk is cleaned up.

use std::path::{Path, PathBuf};

use launchpad_core::{
    env_file::ENV_FILE_NAME,
    procfile::{render_procfile, PROCFILE_NAME},
    EnvFileContent, InstallError, InstallationConfig, Step,
};
use launchpad_local::{atomic_write, LocalCommand, ProcessError, ProcessRunner};

/// Remote name given to the template repository on clone.
pub const SOURCE_REMOTE: &str = "alpha";

/// Message of the single install commit.
pub const COMMIT_MESSAGE: &str = "installed alpha";

/// Runs local steps inside `<workdir>/<app>`.
#[derive(Debug)]
pub struct LocalBuildDriver<R> {
    runner: R,
    workdir: PathBuf,
}

impl<R: ProcessRunner> LocalBuildDriver<R> {
    pub fn new(runner: R, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            workdir: workdir.into(),
        }
    }

    /// Checkout directory for `config`'s app.
    pub fn checkout_dir(&self, config: &InstallationConfig) -> PathBuf {
        self.workdir.join(config.app_name().as_str())
    }

    /// Run `command` as `step`; non-zero exit becomes `LocalStepFailed`.
    pub(crate) fn run_step(&self, step: Step, command: LocalCommand) -> Result<(), InstallError> {
        let status = self
            .runner
            .run(&command)
            .map_err(|e| local_failure(step, e))?;
        if status.success() {
            Ok(())
        } else {
            Err(InstallError::LocalStepFailed {
                step,
                reason: format!("`{command}` returned {status}"),
            })
        }
    }

    pub fn clone_repo(&self, config: &InstallationConfig) -> Result<(), InstallError> {
        let command = LocalCommand::new("git")
            .args(["clone", "-o", SOURCE_REMOTE, config.repo(), config.app_name().as_str()])
            .current_dir(&self.workdir);
        self.run_step(Step::Clone, command)
    }

    /// Create the pinned toolchain environment scoped to the app.
    pub fn install_toolchain(&self, config: &InstallationConfig) -> Result<(), InstallError> {
        let gemset = format!("{}@{}", config.toolchain(), config.app_name());
        let command = LocalCommand::new("rvm")
            .args(["use", gemset.as_str(), "--create"])
            .current_dir(self.checkout_dir(config));
        self.run_step(Step::Toolchain, command)
    }

    pub fn install_dependencies(&self, config: &InstallationConfig) -> Result<(), InstallError> {
        let command = LocalCommand::new("bundle")
            .arg("install")
            .current_dir(self.checkout_dir(config));
        self.run_step(Step::Dependencies, command)
    }

    pub fn run_setup(&self, config: &InstallationConfig) -> Result<(), InstallError> {
        let command = LocalCommand::new("rake")
            .arg("development:install")
            .current_dir(self.checkout_dir(config));
        self.run_step(Step::Setup, command)
    }

    pub fn write_env_file(
        &self,
        config: &InstallationConfig,
        env: &EnvFileContent,
    ) -> Result<PathBuf, InstallError> {
        let path = self.checkout_dir(config).join(ENV_FILE_NAME);
        write_artifact(Step::WriteEnvFile, &path, &env.render())?;
        Ok(path)
    }

    /// Overwrite the Procfile with an active worker line. Returns `None`
    /// without touching the file when workers are disabled.
    pub fn write_procfile(
        &self,
        config: &InstallationConfig,
    ) -> Result<Option<PathBuf>, InstallError> {
        if !config.workers_enabled() {
            tracing::debug!("workers disabled; Procfile left as cloned");
            return Ok(None);
        }
        let path = self.checkout_dir(config).join(PROCFILE_NAME);
        write_artifact(Step::WriteProcfile, &path, &render_procfile(true))?;
        Ok(Some(path))
    }

    /// Stage every change, untracked files included, then commit. An empty
    /// tree still produces the install commit.
    pub fn commit(&self, config: &InstallationConfig) -> Result<(), InstallError> {
        let checkout = self.checkout_dir(config);
        let stage = LocalCommand::new("git")
            .args(["add", "--all"])
            .current_dir(&checkout);
        self.run_step(Step::Commit, stage)?;
        let command = LocalCommand::new("git")
            .args(["commit", "--allow-empty", "-m", COMMIT_MESSAGE])
            .current_dir(checkout);
        self.run_step(Step::Commit, command)
    }

    /// Switch the platform CLI account. Returns `false` when no account is
    /// configured.
    pub fn set_account(&self, config: &InstallationConfig) -> Result<bool, InstallError> {
        let Some(account) = config.account() else {
            return Ok(false);
        };
        let command = LocalCommand::new("heroku")
            .args(["accounts:set", account])
            .current_dir(self.checkout_dir(config));
        self.run_step(Step::SetAccount, command)?;
        Ok(true)
    }
}

fn write_artifact(step: Step, path: &Path, content: &str) -> Result<(), InstallError> {
    atomic_write(path, content).map_err(|e| match e {
        ProcessError::Io { path, source } => InstallError::Io { path, source },
        other => local_failure(step, other),
    })
}

fn local_failure(step: Step, err: ProcessError) -> InstallError {
    InstallError::LocalStepFailed {
        step,
        reason: err.to_string(),
    }
}
