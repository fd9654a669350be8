//! Push to the platform and scale workers.

use launchpad_core::{InstallError, InstallationConfig, RemoteAppHandle, Step};
use launchpad_local::{LocalCommand, ProcessRunner};
use launchpad_platform::PlatformApi;

use crate::build::LocalBuildDriver;
use crate::provision::RemoteProvisioner;

/// Git remote name of the platform deployment target.
pub const DEPLOY_REMOTE: &str = "heroku";

/// Branch pushed to the deployment target.
pub const DEPLOY_BRANCH: &str = "master";

/// Process type scaled after the push.
pub const WORKER_PROCESS: &str = "worker";

/// Whether [`DeployDriver::provision_workers`] will call the platform.
/// One worker is the platform default, so it is never requested.
pub fn scaling_required(config: &InstallationConfig) -> bool {
    config.workers_enabled() && config.worker_count() > 1
}

/// Deploys the committed checkout.
pub struct DeployDriver<'a, P, R> {
    provisioner: &'a RemoteProvisioner<P>,
    local: &'a LocalBuildDriver<R>,
}

impl<'a, P: PlatformApi, R: ProcessRunner> DeployDriver<'a, P, R> {
    pub fn new(provisioner: &'a RemoteProvisioner<P>, local: &'a LocalBuildDriver<R>) -> Self {
        Self { provisioner, local }
    }

    /// Register the app's git URL as the deploy remote.
    pub fn add_remote(
        &self,
        config: &InstallationConfig,
        app: &RemoteAppHandle,
    ) -> Result<(), InstallError> {
        let info = self.provisioner.app_info(app)?;
        let git_url = info.git_url.ok_or_else(|| InstallError::DeployFailed {
            reason: format!("platform reported no git URL for {}", app.name),
        })?;
        let command = LocalCommand::new("git")
            .args(["remote", "add", DEPLOY_REMOTE, git_url.as_str()])
            .current_dir(self.local.checkout_dir(config));
        self.local.run_step(Step::AddRemote, command)
    }

    /// Blocking push of the local history to the deployment target.
    pub fn push(&self, config: &InstallationConfig) -> Result<(), InstallError> {
        let command = LocalCommand::new("git")
            .args(["push", DEPLOY_REMOTE, DEPLOY_BRANCH])
            .current_dir(self.local.checkout_dir(config));
        self.local
            .run_step(Step::Push, command)
            .map_err(|e| InstallError::DeployFailed {
                reason: e.to_string(),
            })
    }

    /// Scale the worker process type. Returns the count requested, or `None`
    /// when no call was made.
    pub fn provision_workers(
        &self,
        config: &InstallationConfig,
        app: &RemoteAppHandle,
    ) -> Result<Option<u32>, InstallError> {
        if !scaling_required(config) {
            tracing::debug!("worker scaling not required");
            return Ok(None);
        }
        let count = config.worker_count();
        self.provisioner.scale_process(app, WORKER_PROCESS, count)?;
        Ok(Some(count))
    }
}
