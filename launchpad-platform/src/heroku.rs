//! Heroku Platform API v3 client over `ureq`.
//!
//! Only the five endpoints in [`PlatformApi`] are wrapped. Credentials are
//! passed to [`HerokuClient::new`]; nothing is read from the environment.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use launchpad_core::{AddonId, AppName, ConfigVarMap, RemoteAppHandle};

use crate::api::{AppInfo, PlatformApi};
use crate::error::{classify, PlatformError};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.heroku.com";

const ACCEPT: &str = "application/vnd.heroku+json; version=3";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body returned by the platform on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Blocking Heroku API client.
pub struct HerokuClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HerokuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HerokuClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HerokuClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against a non-default API root (used by tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .user_agent(concat!("launchpad/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "platform request");
        self.agent
            .request(method, &url)
            .set("Accept", ACCEPT)
            .set("Authorization", &format!("Bearer {}", self.api_key))
    }
}

/// Turn a `ureq` failure into a [`PlatformError`], reading the error body.
fn map_error(err: ureq::Error) -> PlatformError {
    match err {
        ureq::Error::Status(code, response) => {
            let body: Option<ApiErrorBody> = response.into_json().ok();
            let (id, message) = match body {
                Some(b) => (b.id, b.message.unwrap_or_default()),
                None => (None, String::new()),
            };
            classify(code, id.as_deref(), message)
        }
        ureq::Error::Transport(t) => PlatformError::Transport(t.to_string()),
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: ureq::Response) -> Result<T, PlatformError> {
    response
        .into_json()
        .map_err(|e| PlatformError::Decode(e.to_string()))
}

impl PlatformApi for HerokuClient {
    fn create_app(&self, name: &AppName) -> Result<AppInfo, PlatformError> {
        let response = self
            .request("POST", "/apps")
            .send_json(json!({ "name": name.as_str() }))
            .map_err(map_error)?;
        decode(response)
    }

    fn install_addon(&self, app: &RemoteAppHandle, addon: &AddonId) -> Result<(), PlatformError> {
        self.request("POST", &format!("/apps/{}/addons", app.path_segment()))
            .send_json(json!({ "plan": addon.as_str() }))
            .map_err(map_error)?;
        Ok(())
    }

    fn config_vars(&self, app: &RemoteAppHandle) -> Result<ConfigVarMap, PlatformError> {
        let response = self
            .request("GET", &format!("/apps/{}/config-vars", app.path_segment()))
            .call()
            .map_err(map_error)?;
        decode(response)
    }

    fn scale_process(
        &self,
        app: &RemoteAppHandle,
        process_type: &str,
        quantity: u32,
    ) -> Result<(), PlatformError> {
        self.request(
            "PATCH",
            &format!("/apps/{}/formation/{}", app.path_segment(), process_type),
        )
        .send_json(json!({ "quantity": quantity }))
        .map_err(map_error)?;
        Ok(())
    }

    fn app_info(&self, app: &RemoteAppHandle) -> Result<AppInfo, PlatformError> {
        let response = self
            .request("GET", &format!("/apps/{}", app.path_segment()))
            .call()
            .map_err(map_error)?;
        decode(response)
    }
}
