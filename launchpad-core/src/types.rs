//! Domain types for a single installation run.
//!
//! Everything here is transient: built once from operator input, read by the
//! provisioning, local setup and deploy phases, and dropped at process end.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InstallError;

/// Template repository cloned when no explicit source is given.
pub const DEFAULT_REPO: &str = "git://github.com/activefx/alpha.git";

/// Ruby toolchain pinned for every checkout.
pub const DEFAULT_TOOLCHAIN: &str = "1.9.3-p392";

/// Config vars read back from the platform, ordered by key.
pub type ConfigVarMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of the remote application; also names the local checkout directory
/// and the asset bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppName(String);

impl AppName {
    /// Shortest and longest name the platform accepts.
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 30;

    /// Validate and wrap an app name.
    ///
    /// Accepted: 3 to 30 characters, a lowercase ASCII letter first, then
    /// lowercase letters, digits and `-`, not ending in `-`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InstallError> {
        let raw = raw.into();
        let invalid = |why: &str| InstallError::InvalidConfig(format!("app name '{raw}' {why}"));

        let mut chars = raw.chars();
        let valid_head = chars.next().is_some_and(|c| c.is_ascii_lowercase());
        let valid_tail = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_head || !valid_tail {
            return Err(invalid(
                "must start with a lowercase letter and contain only lowercase letters, \
                 digits and '-'",
            ));
        }
        if raw.ends_with('-') {
            return Err(invalid("must not end with '-'"));
        }
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&raw.len()) {
            return Err(invalid(&format!(
                "must be {} to {} characters long",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for AppName {
    type Error = InstallError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<AppName> for String {
    fn from(name: AppName) -> Self {
        name.0
    }
}

/// Identifier of a platform add-on (e.g. `mongolab`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddonId(pub String);

impl AddonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AddonId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for AddonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Handle returned by app creation and used for every later remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAppHandle {
    /// Platform-assigned identifier.
    pub id: String,
    pub name: AppName,
}

impl RemoteAppHandle {
    /// Path segment used to address the app in API calls.
    pub fn path_segment(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for RemoteAppHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Object-storage access pair. Only exists when both halves were supplied.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Installation config
// ---------------------------------------------------------------------------

/// Validated input of one installation run.
#[derive(Clone)]
pub struct InstallationConfig {
    app_name: AppName,
    api_key: String,
    storage: Option<StorageCredentials>,
    mailing_api_key: Option<String>,
    workers: Option<u32>,
    addons: Vec<AddonId>,
    all_addons: bool,
    repo: String,
    account: Option<String>,
    toolchain: String,
}

impl fmt::Debug for InstallationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationConfig")
            .field("app_name", &self.app_name)
            .field("storage", &self.storage)
            .field("mailing", &self.mailing_api_key.is_some())
            .field("workers", &self.workers)
            .field("addons", &self.addons)
            .field("all_addons", &self.all_addons)
            .field("repo", &self.repo)
            .field("account", &self.account)
            .field("toolchain", &self.toolchain)
            .finish_non_exhaustive()
    }
}

impl InstallationConfig {
    pub fn builder(app_name: impl Into<String>) -> InstallationConfigBuilder {
        InstallationConfigBuilder {
            app_name: app_name.into(),
            ..InstallationConfigBuilder::default()
        }
    }

    pub fn app_name(&self) -> &AppName {
        &self.app_name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn storage(&self) -> Option<&StorageCredentials> {
        self.storage.as_ref()
    }

    pub fn mailing_api_key(&self) -> Option<&str> {
        self.mailing_api_key.as_deref()
    }

    /// Explicitly requested add-ons, duplicates removed, in request order.
    pub fn explicit_addons(&self) -> &[AddonId] {
        &self.addons
    }

    pub fn all_addons(&self) -> bool {
        self.all_addons
    }

    /// Add-ons installed during provisioning.
    pub fn selected_addons(&self) -> Vec<AddonId> {
        crate::addons::select_addons(self.all_addons, &self.addons)
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn toolchain(&self) -> &str {
        &self.toolchain
    }

    pub fn storage_enabled(&self) -> bool {
        self.storage.is_some()
    }

    pub fn mailing_enabled(&self) -> bool {
        self.mailing_api_key.is_some()
    }

    /// Workers are provisioned when every add-on was requested or a worker
    /// count was given explicitly.
    pub fn workers_enabled(&self) -> bool {
        self.all_addons || self.workers.is_some()
    }

    /// Requested worker count; unset means one.
    pub fn worker_count(&self) -> u32 {
        self.workers.unwrap_or(1)
    }

    /// Name of the private asset bucket, `{app}-assets`.
    pub fn bucket_name(&self) -> String {
        format!("{}-assets", self.app_name)
    }
}

/// Builder for [`InstallationConfig`]; validation happens in [`build`].
///
/// [`build`]: InstallationConfigBuilder::build
#[derive(Debug, Default)]
pub struct InstallationConfigBuilder {
    app_name: String,
    api_key: Option<String>,
    storage_id: Option<String>,
    storage_secret: Option<String>,
    mailing_api_key: Option<String>,
    workers: Option<u32>,
    addons: Vec<String>,
    all_addons: bool,
    repo: Option<String>,
    account: Option<String>,
    toolchain: Option<String>,
}

impl InstallationConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn storage(mut self, id: Option<String>, secret: Option<String>) -> Self {
        self.storage_id = id;
        self.storage_secret = secret;
        self
    }

    pub fn mailing_api_key(mut self, key: Option<String>) -> Self {
        self.mailing_api_key = key;
        self
    }

    pub fn workers(mut self, count: Option<u32>) -> Self {
        self.workers = count;
        self
    }

    pub fn addons<I, S>(mut self, addons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addons = addons.into_iter().map(Into::into).collect();
        self
    }

    pub fn all_addons(mut self, all: bool) -> Self {
        self.all_addons = all;
        self
    }

    pub fn repo(mut self, repo: Option<String>) -> Self {
        self.repo = repo;
        self
    }

    pub fn account(mut self, account: Option<String>) -> Self {
        self.account = account;
        self
    }

    pub fn toolchain(mut self, toolchain: Option<String>) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn build(self) -> Result<InstallationConfig, InstallError> {
        let app_name = AppName::parse(self.app_name)?;

        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| InstallError::InvalidConfig("platform API key is required".into()))?;

        let storage = match (non_blank(self.storage_id), non_blank(self.storage_secret)) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StorageCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => {
                return Err(InstallError::InvalidConfig(
                    "storage id and secret must be given together".into(),
                ))
            }
        };

        if self.workers == Some(0) {
            return Err(InstallError::InvalidConfig(
                "worker count must be a positive integer".into(),
            ));
        }

        let mut addons: Vec<AddonId> = Vec::with_capacity(self.addons.len());
        for raw in self.addons {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let id = AddonId::from(raw);
            if !addons.contains(&id) {
                addons.push(id);
            }
        }

        Ok(InstallationConfig {
            app_name,
            api_key,
            storage,
            mailing_api_key: non_blank(self.mailing_api_key),
            workers: self.workers,
            addons,
            all_addons: self.all_addons,
            repo: non_blank(self.repo).unwrap_or_else(|| DEFAULT_REPO.to_owned()),
            account: non_blank(self.account),
            toolchain: non_blank(self.toolchain).unwrap_or_else(|| DEFAULT_TOOLCHAIN.to_owned()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Phases and steps
// ---------------------------------------------------------------------------

/// The three fixed phases of an installation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Provisioning,
    LocalSetup,
    Deploy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Provisioning => write!(f, "heroku_provisioning"),
            Phase::LocalSetup => write!(f, "local_setup"),
            Phase::Deploy => write!(f, "deploy"),
        }
    }
}

/// Every step of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateApp,
    InstallAddons,
    PrepareStorage,
    OutputEnvFile,
    Clone,
    Toolchain,
    Dependencies,
    Setup,
    WriteEnvFile,
    WriteProcfile,
    Commit,
    SetAccount,
    AddRemote,
    Push,
    ProvisionWorkers,
}

impl Step {
    pub const ALL: [Step; 15] = [
        Step::CreateApp,
        Step::InstallAddons,
        Step::PrepareStorage,
        Step::OutputEnvFile,
        Step::Clone,
        Step::Toolchain,
        Step::Dependencies,
        Step::Setup,
        Step::WriteEnvFile,
        Step::WriteProcfile,
        Step::Commit,
        Step::SetAccount,
        Step::AddRemote,
        Step::Push,
        Step::ProvisionWorkers,
    ];

    pub fn phase(self) -> Phase {
        match self {
            Step::CreateApp | Step::InstallAddons | Step::PrepareStorage | Step::OutputEnvFile => {
                Phase::Provisioning
            }
            Step::Clone
            | Step::Toolchain
            | Step::Dependencies
            | Step::Setup
            | Step::WriteEnvFile
            | Step::WriteProcfile
            | Step::Commit
            | Step::SetAccount => Phase::LocalSetup,
            Step::AddRemote | Step::Push | Step::ProvisionWorkers => Phase::Deploy,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CreateApp => "create-app",
            Step::InstallAddons => "install-addons",
            Step::PrepareStorage => "prepare-storage",
            Step::OutputEnvFile => "output-env-file",
            Step::Clone => "clone",
            Step::Toolchain => "toolchain",
            Step::Dependencies => "dependencies",
            Step::Setup => "setup",
            Step::WriteEnvFile => "write-env-file",
            Step::WriteProcfile => "write-procfile",
            Step::Commit => "commit",
            Step::SetAccount => "set-account",
            Step::AddRemote => "add-remote",
            Step::Push => "push",
            Step::ProvisionWorkers => "provision-workers",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
