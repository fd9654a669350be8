//! Recording fakes for the platform, object store and process runner.

#![allow(dead_code)]

use std::cell::RefCell;

use launchpad_core::{AddonId, AppName, ConfigVarMap, RemoteAppHandle, StorageCredentials};
use launchpad_local::{ExitStatus, LocalCommand, ProcessError, ProcessRunner};
use launchpad_platform::{
    AppInfo, ObjectStore, ObjectStoreFactory, PlatformApi, PlatformError,
};

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct PlatformCalls {
    pub creates: usize,
    pub addon_attempts: usize,
    pub addons: Vec<String>,
    pub fetches: usize,
    pub scales: Vec<(String, u32)>,
    pub app_infos: usize,
}

pub struct FakePlatform {
    pub create_error: Option<fn() -> PlatformError>,
    /// Zero-based index of the add-on install that fails.
    pub fail_addon_at: Option<usize>,
    pub config_vars: ConfigVarMap,
    pub git_url: Option<String>,
    pub calls: RefCell<PlatformCalls>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            create_error: None,
            fail_addon_at: None,
            config_vars: ConfigVarMap::new(),
            git_url: Some("https://git.heroku.com/demo.git".into()),
            calls: RefCell::new(PlatformCalls::default()),
        }
    }
}

impl FakePlatform {
    pub fn with_vars(pairs: &[(&str, &str)]) -> Self {
        Self {
            config_vars: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> PlatformCalls {
        self.calls.borrow().clone()
    }
}

impl PlatformApi for FakePlatform {
    fn create_app(&self, name: &AppName) -> Result<AppInfo, PlatformError> {
        self.calls.borrow_mut().creates += 1;
        if let Some(make) = self.create_error {
            return Err(make());
        }
        Ok(AppInfo {
            id: format!("id-{name}"),
            name: name.to_string(),
            git_url: self.git_url.clone(),
            web_url: None,
        })
    }

    fn install_addon(&self, _app: &RemoteAppHandle, addon: &AddonId) -> Result<(), PlatformError> {
        let mut calls = self.calls.borrow_mut();
        let index = calls.addon_attempts;
        calls.addon_attempts += 1;
        if self.fail_addon_at == Some(index) {
            return Err(PlatformError::Status {
                code: 422,
                message: format!("{addon} unavailable"),
            });
        }
        calls.addons.push(addon.to_string());
        Ok(())
    }

    fn config_vars(&self, _app: &RemoteAppHandle) -> Result<ConfigVarMap, PlatformError> {
        self.calls.borrow_mut().fetches += 1;
        Ok(self.config_vars.clone())
    }

    fn scale_process(
        &self,
        _app: &RemoteAppHandle,
        process_type: &str,
        quantity: u32,
    ) -> Result<(), PlatformError> {
        self.calls
            .borrow_mut()
            .scales
            .push((process_type.to_owned(), quantity));
        Ok(())
    }

    fn app_info(&self, app: &RemoteAppHandle) -> Result<AppInfo, PlatformError> {
        self.calls.borrow_mut().app_infos += 1;
        Ok(AppInfo {
            id: format!("id-{}", app.name),
            name: app.name.to_string(),
            git_url: self.git_url.clone(),
            web_url: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeStore {
    pub fail: bool,
    pub connects: RefCell<usize>,
    pub buckets: RefCell<Vec<(String, bool)>>,
}

impl ObjectStore for FakeStore {
    fn create_bucket(&self, name: &str, public: bool) -> Result<(), PlatformError> {
        let exists = self.buckets.borrow().iter().any(|(b, _)| b == name);
        if self.fail || exists {
            return Err(PlatformError::Storage(format!("BucketAlreadyExists: {name}")));
        }
        self.buckets.borrow_mut().push((name.to_owned(), public));
        Ok(())
    }
}

impl<'a> ObjectStoreFactory for &'a FakeStore {
    type Store = &'a FakeStore;

    fn connect(&self, _credentials: &StorageCredentials) -> Result<&'a FakeStore, PlatformError> {
        *self.connects.borrow_mut() += 1;
        Ok(*self)
    }
}

// ---------------------------------------------------------------------------
// Process runner
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeRunner {
    /// Commands whose display form starts with this prefix exit with 1.
    pub fail_prefix: Option<String>,
    pub commands: RefCell<Vec<LocalCommand>>,
    /// Whether `.env` existed in the working directory when `git add` ran.
    pub env_present_at_stage: RefCell<Option<bool>>,
}

impl FakeRunner {
    pub fn failing(prefix: &str) -> Self {
        Self {
            fail_prefix: Some(prefix.to_owned()),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.commands.borrow().iter().map(|c| c.to_string()).collect()
    }

    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, command: &LocalCommand) -> Result<ExitStatus, ProcessError> {
        self.commands.borrow_mut().push(command.clone());
        if command.to_string().starts_with("git add") {
            let present = command
                .cwd
                .as_deref()
                .is_some_and(|dir| dir.join(".env").exists());
            *self.env_present_at_stage.borrow_mut() = Some(present);
        }
        let failed = self
            .fail_prefix
            .as_deref()
            .is_some_and(|p| command.to_string().starts_with(p));
        Ok(if failed {
            ExitStatus { code: Some(1) }
        } else {
            ExitStatus::SUCCESS
        })
    }
}
