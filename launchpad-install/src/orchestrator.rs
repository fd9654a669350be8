//! Installation run: provisioning, local setup, deploy.
//!
//! ```text
//! Created ──heroku_provisioning──▶ Provisioned ──local_setup──▶ LocallyBuilt
//!         ──deploy──▶ Deployed ──▶ Done
//! ```
//!
//! Any failing step moves the run to `Failed` and nothing after it runs.
//! Completed remote and local side effects are left in place.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use launchpad_core::{
    addons::effective_optional_addons, build_env_file, env_file::ENV_FILE_NAME, error::io_err,
    procfile::PROCFILE_NAME, AddonId, EnvFileContent, InstallError, InstallationConfig, Phase,
    RemoteAppHandle, Step,
};
use launchpad_local::ProcessRunner;
use launchpad_platform::{ObjectStoreFactory, PlatformApi};

use crate::build::{LocalBuildDriver, COMMIT_MESSAGE};
use crate::deploy::{scaling_required, DeployDriver, DEPLOY_BRANCH, DEPLOY_REMOTE, WORKER_PROCESS};
use crate::error::RunFailure;
use crate::provision::RemoteProvisioner;
use crate::storage::prepare_storage;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Created,
    Provisioned,
    LocallyBuilt,
    Deployed,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Created => "created",
            RunState::Provisioned => "provisioned",
            RunState::LocallyBuilt => "locally-built",
            RunState::Deployed => "deployed",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub app: RemoteAppHandle,
    pub addons: Vec<AddonId>,
    pub bucket: Option<String>,
    pub env: EnvFileContent,
    pub env_path: PathBuf,
    pub procfile_path: Option<PathBuf>,
    pub account_switched: bool,
    pub workers_scaled: Option<u32>,
    /// Steps that did work.
    pub completed: Vec<Step>,
    /// Conditional steps whose condition was off for this config.
    pub skipped: Vec<Step>,
    pub state: RunState,
}

/// Tracks the current state and finished steps; turns the first error into
/// a [`RunFailure`].
struct Tracker {
    state: RunState,
    completed: Vec<Step>,
    skipped: Vec<Step>,
}

impl Tracker {
    fn new() -> Self {
        Self {
            state: RunState::Created,
            completed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn step<T>(
        &mut self,
        step: Step,
        f: impl FnOnce() -> Result<T, InstallError>,
    ) -> Result<T, RunFailure> {
        let value = self.attempt(step, f)?;
        self.completed.push(step);
        tracing::info!(step = %step, "done");
        Ok(value)
    }

    /// Like [`Tracker::step`], but `None` records the step as skipped.
    fn optional<T>(
        &mut self,
        step: Step,
        f: impl FnOnce() -> Result<Option<T>, InstallError>,
    ) -> Result<Option<T>, RunFailure> {
        let value = self.attempt(step, f)?;
        if value.is_some() {
            self.completed.push(step);
            tracing::info!(step = %step, "done");
        } else {
            self.skipped.push(step);
            tracing::info!(step = %step, "skipped");
        }
        Ok(value)
    }

    fn attempt<T>(
        &mut self,
        step: Step,
        f: impl FnOnce() -> Result<T, InstallError>,
    ) -> Result<T, RunFailure> {
        tracing::info!(step = %step, "start");
        match f() {
            Ok(value) => Ok(value),
            Err(source) => {
                let reached = self.state;
                self.state = RunState::Failed;
                tracing::error!(step = %step, error = %source, "step failed");
                Err(RunFailure {
                    phase: step.phase(),
                    step,
                    reached,
                    source,
                })
            }
        }
    }

    fn advance(&mut self, to: RunState) {
        tracing::debug!(from = %self.state, to = %to, "state change");
        self.state = to;
    }
}

// ---------------------------------------------------------------------------
// Installer
// ---------------------------------------------------------------------------

/// Composes the remote provisioner, storage preparer, local build driver
/// and deploy driver into one strictly sequential run.
pub struct Installer<P, F, R> {
    provisioner: RemoteProvisioner<P>,
    storage: F,
    local: LocalBuildDriver<R>,
}

impl<P, F, R> Installer<P, F, R>
where
    P: PlatformApi,
    F: ObjectStoreFactory,
    R: ProcessRunner,
{
    pub fn new(platform: P, storage: F, runner: R, workdir: impl Into<PathBuf>) -> Self {
        Self {
            provisioner: RemoteProvisioner::new(platform),
            storage,
            local: LocalBuildDriver::new(runner, workdir),
        }
    }

    /// Run every phase. The environment file is echoed to `echo` once it has
    /// been built.
    pub fn run(
        &self,
        config: &InstallationConfig,
        echo: &mut dyn Write,
    ) -> Result<RunReport, RunFailure> {
        let mut t = Tracker::new();
        let addons = config.selected_addons();

        // heroku_provisioning
        let (app, bucket, env) = {
            let _phase = tracing::info_span!("phase", name = %Phase::Provisioning).entered();
            let app = t.step(Step::CreateApp, || {
                self.provisioner.create_app(config.app_name())
            })?;
            t.step(Step::InstallAddons, || {
                self.provisioner.install_addons(&app, &addons)
            })?;
            let bucket =
                t.optional(Step::PrepareStorage, || prepare_storage(config, &self.storage))?;
            let env = t.step(Step::OutputEnvFile, || {
                let vars = self.provisioner.fetch_config_vars(&app)?;
                let env = build_env_file(config, &vars)?;
                writeln!(echo, "{env}").map_err(|e| io_err("<stdout>", e))?;
                Ok(env)
            })?;
            t.advance(RunState::Provisioned);
            (app, bucket, env)
        };

        // local_setup
        let (env_path, procfile_path, account_switched) = {
            let _phase = tracing::info_span!("phase", name = %Phase::LocalSetup).entered();
            t.step(Step::Clone, || self.local.clone_repo(config))?;
            t.step(Step::Toolchain, || self.local.install_toolchain(config))?;
            t.step(Step::Dependencies, || self.local.install_dependencies(config))?;
            t.step(Step::Setup, || self.local.run_setup(config))?;
            let env_path = t.step(Step::WriteEnvFile, || self.local.write_env_file(config, &env))?;
            let procfile_path =
                t.optional(Step::WriteProcfile, || self.local.write_procfile(config))?;
            t.step(Step::Commit, || self.local.commit(config))?;
            let account_switched = t
                .optional(Step::SetAccount, || {
                    Ok(self.local.set_account(config)?.then_some(()))
                })?
                .is_some();
            t.advance(RunState::LocallyBuilt);
            (env_path, procfile_path, account_switched)
        };

        // deploy
        let workers_scaled = {
            let _phase = tracing::info_span!("phase", name = %Phase::Deploy).entered();
            let deploy = DeployDriver::new(&self.provisioner, &self.local);
            t.step(Step::AddRemote, || deploy.add_remote(config, &app))?;
            t.step(Step::Push, || deploy.push(config))?;
            t.advance(RunState::Deployed);
            t.optional(Step::ProvisionWorkers, || deploy.provision_workers(config, &app))?
        };

        t.advance(RunState::Done);
        Ok(RunReport {
            app,
            addons,
            bucket,
            env,
            env_path,
            procfile_path,
            account_switched,
            workers_scaled,
            completed: t.completed,
            skipped: t.skipped,
            state: t.state,
        })
    }

    /// Install the optional add-ons on an app created by an earlier run:
    /// the explicit list when one was given, the optional set otherwise.
    pub fn install_optional_addons(
        &self,
        config: &InstallationConfig,
    ) -> Result<Vec<AddonId>, InstallError> {
        let app = self.provisioner.existing_app(config.app_name())?;
        let addons = effective_optional_addons(config.explicit_addons());
        self.provisioner.install_addons(&app, &addons)?;
        Ok(addons)
    }

    /// Build the environment file for an existing app without side effects
    /// beyond reading its config vars.
    pub fn render_env(&self, config: &InstallationConfig) -> Result<EnvFileContent, InstallError> {
        let app = self.provisioner.existing_app(config.app_name())?;
        let vars = self.provisioner.fetch_config_vars(&app)?;
        build_env_file(config, &vars)
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One step of a run as it would execute for a given config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: Step,
    /// What the step does, or `None` when it would be skipped.
    pub action: Option<String>,
}

/// Describe every step a run would execute for `config`, without running
/// anything.
pub fn plan(config: &InstallationConfig) -> Vec<PlannedStep> {
    let app = config.app_name();
    Step::ALL
        .iter()
        .map(|&step| {
            let action = match step {
                Step::CreateApp => Some(format!("create app '{app}'")),
                Step::InstallAddons => Some(format!(
                    "install add-ons: {}",
                    config
                        .selected_addons()
                        .iter()
                        .map(AddonId::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
                Step::PrepareStorage => config
                    .storage_enabled()
                    .then(|| format!("create private bucket '{}'", config.bucket_name())),
                Step::OutputEnvFile => Some("fetch config vars and print env file".to_owned()),
                Step::Clone => Some(format!("git clone {} {app}", config.repo())),
                Step::Toolchain => Some(format!("rvm use {}@{app} --create", config.toolchain())),
                Step::Dependencies => Some("bundle install".to_owned()),
                Step::Setup => Some("rake development:install".to_owned()),
                Step::WriteEnvFile => Some(format!("write {app}/{ENV_FILE_NAME}")),
                Step::WriteProcfile => config
                    .workers_enabled()
                    .then(|| format!("write {app}/{PROCFILE_NAME} with worker process")),
                Step::Commit => Some(format!(
                    "git add --all && git commit -m \"{COMMIT_MESSAGE}\""
                )),
                Step::SetAccount => config
                    .account()
                    .map(|a| format!("heroku accounts:set {a}")),
                Step::AddRemote => Some(format!("git remote add {DEPLOY_REMOTE} <app git url>")),
                Step::Push => Some(format!("git push {DEPLOY_REMOTE} {DEPLOY_BRANCH}")),
                Step::ProvisionWorkers => scaling_required(config).then(|| {
                    format!("scale {WORKER_PROCESS} to {}", config.worker_count())
                }),
            };
            PlannedStep { step, action }
        })
        .collect()
}
