//! Remote provisioning: app creation, add-ons, config vars, scaling.

use launchpad_core::{AddonId, AppName, ConfigVarMap, InstallError, RemoteAppHandle};
use launchpad_platform::{AppInfo, PlatformApi, PlatformError};

/// Wraps a [`PlatformApi`] and maps its failures onto [`InstallError`].
#[derive(Debug)]
pub struct RemoteProvisioner<P> {
    api: P,
}

impl<P: PlatformApi> RemoteProvisioner<P> {
    pub fn new(api: P) -> Self {
        Self { api }
    }

    /// Create the app and return the handle for later calls.
    pub fn create_app(&self, name: &AppName) -> Result<RemoteAppHandle, InstallError> {
        let info = self.api.create_app(name).map_err(|e| match e {
            PlatformError::Conflict { .. } => InstallError::RemoteConflict {
                name: name.to_string(),
            },
            other => remote_err("create-app", other),
        })?;
        let handle = RemoteAppHandle {
            id: info.id,
            name: name.clone(),
        };
        tracing::info!("created app {handle}");
        Ok(handle)
    }

    /// Install add-ons one by one in order. The first failure stops the
    /// loop; add-ons already attached stay attached.
    pub fn install_addons(
        &self,
        app: &RemoteAppHandle,
        addons: &[AddonId],
    ) -> Result<(), InstallError> {
        for addon in addons {
            tracing::info!(addon = %addon, "installing add-on");
            self.api
                .install_addon(app, addon)
                .map_err(|e| InstallError::AddonInstall {
                    addon: addon.to_string(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Read config vars. Call only after add-ons are installed, since they
    /// inject their own variables.
    pub fn fetch_config_vars(&self, app: &RemoteAppHandle) -> Result<ConfigVarMap, InstallError> {
        let vars = self
            .api
            .config_vars(app)
            .map_err(|e| remote_err("config-vars", e))?;
        tracing::debug!(count = vars.len(), "fetched config vars");
        Ok(vars)
    }

    pub fn scale_process(
        &self,
        app: &RemoteAppHandle,
        process_type: &str,
        quantity: u32,
    ) -> Result<(), InstallError> {
        tracing::info!(process_type, quantity, "scaling");
        self.api
            .scale_process(app, process_type, quantity)
            .map_err(|e| remote_err("scale-process", e))
    }

    pub fn app_info(&self, app: &RemoteAppHandle) -> Result<AppInfo, InstallError> {
        self.api.app_info(app).map_err(|e| remote_err("app-info", e))
    }

    /// Resolve a handle for an app created by an earlier run.
    pub fn existing_app(&self, name: &AppName) -> Result<RemoteAppHandle, InstallError> {
        let provisional = RemoteAppHandle {
            id: name.to_string(),
            name: name.clone(),
        };
        let info = self.app_info(&provisional)?;
        Ok(RemoteAppHandle {
            id: info.id,
            name: name.clone(),
        })
    }
}

pub(crate) fn remote_err(operation: &'static str, err: PlatformError) -> InstallError {
    match err {
        PlatformError::Unauthorized { message } => InstallError::RemoteAuth(message),
        other => InstallError::Remote {
            operation,
            reason: other.to_string(),
        },
    }
}
