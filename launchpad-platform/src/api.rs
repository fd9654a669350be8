//! The narrow platform interface the installer depends on.

use serde::{Deserialize, Serialize};

use launchpad_core::{AddonId, AppName, ConfigVarMap, RemoteAppHandle};

use crate::error::PlatformError;

/// App fields read from create-app and app-info responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub git_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Remote operations used during an installation run. Every call is a
/// single blocking request with no retry.
pub trait PlatformApi {
    fn create_app(&self, name: &AppName) -> Result<AppInfo, PlatformError>;

    fn install_addon(&self, app: &RemoteAppHandle, addon: &AddonId) -> Result<(), PlatformError>;

    fn config_vars(&self, app: &RemoteAppHandle) -> Result<ConfigVarMap, PlatformError>;

    fn scale_process(
        &self,
        app: &RemoteAppHandle,
        process_type: &str,
        quantity: u32,
    ) -> Result<(), PlatformError>;

    fn app_info(&self, app: &RemoteAppHandle) -> Result<AppInfo, PlatformError>;
}

impl<T: PlatformApi + ?Sized> PlatformApi for &T {
    fn create_app(&self, name: &AppName) -> Result<AppInfo, PlatformError> {
        (**self).create_app(name)
    }

    fn install_addon(&self, app: &RemoteAppHandle, addon: &AddonId) -> Result<(), PlatformError> {
        (**self).install_addon(app, addon)
    }

    fn config_vars(&self, app: &RemoteAppHandle) -> Result<ConfigVarMap, PlatformError> {
        (**self).config_vars(app)
    }

    fn scale_process(
        &self,
        app: &RemoteAppHandle,
        process_type: &str,
        quantity: u32,
    ) -> Result<(), PlatformError> {
        (**self).scale_process(app, process_type, quantity)
    }

    fn app_info(&self, app: &RemoteAppHandle) -> Result<AppInfo, PlatformError> {
        (**self).app_info(app)
    }
}
