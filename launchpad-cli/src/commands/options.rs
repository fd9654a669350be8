//! Options shared by every subcommand, merged over the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use launchpad_core::{config, InstallationConfig};
use launchpad_install::Installer;
use launchpad_local::SystemRunner;
use launchpad_platform::{HerokuClient, S3Factory};

/// App name, credentials and feature flags.
#[derive(Args, Debug)]
pub struct AppOptions {
    /// Name of the platform app; also the checkout directory name.
    pub app_name: String,

    /// Platform API key.
    #[arg(long, env = "HEROKU_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Config file with defaults (default: ~/.launchpad.yaml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Object storage access key id.
    #[arg(long, value_name = "ID")]
    pub s3_id: Option<String>,

    /// Object storage secret key.
    #[arg(long, value_name = "KEY")]
    pub s3_key: Option<String>,

    /// Mailing API key written to the environment file.
    #[arg(long, value_name = "KEY")]
    pub mailchimp_api_key: Option<String>,

    /// Number of worker processes; enables workers.
    #[arg(long, value_name = "N")]
    pub workers: Option<u32>,

    /// Optional add-on to install (repeatable).
    #[arg(long = "addon", value_name = "NAME")]
    pub addons: Vec<String>,

    /// Install every optional add-on and enable workers.
    #[arg(long)]
    pub all: bool,

    /// Source repository to clone.
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,

    /// Platform CLI account to switch to after committing.
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// Toolchain version for the checkout.
    #[arg(long, value_name = "VERSION")]
    pub toolchain: Option<String>,
}

impl AppOptions {
    /// Merge flags over the config file and validate.
    pub fn resolve(&self) -> Result<InstallationConfig> {
        let file = match &self.config {
            Some(path) => config::load(path)
                .with_context(|| format!("cannot read config '{}'", path.display()))?,
            None => match dirs::home_dir() {
                Some(home) => config::load_or_default(&config::default_path_at(&home))
                    .context("cannot read ~/.launchpad.yaml")?,
                None => config::ConfigFile::default(),
            },
        };

        let addons = if self.addons.is_empty() {
            file.addons
        } else {
            self.addons.clone()
        };

        let mut builder = InstallationConfig::builder(self.app_name.clone())
            .storage(
                self.s3_id.clone().or(file.s3_id),
                self.s3_key.clone().or(file.s3_key),
            )
            .mailing_api_key(self.mailchimp_api_key.clone().or(file.mailchimp_api_key))
            .workers(self.workers.or(file.workers))
            .addons(addons)
            .all_addons(self.all || file.all)
            .repo(self.repo.clone().or(file.repo))
            .account(self.account.clone().or(file.account))
            .toolchain(self.toolchain.clone().or(file.toolchain));
        if let Some(key) = self.api_key.clone().or(file.api_key) {
            builder = builder.api_key(key);
        }

        let config = builder.build().context("invalid installation options")?;
        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}

/// Installer wired to the real platform, S3 and local processes.
pub fn installer(
    config: &InstallationConfig,
    workdir: &Path,
) -> Installer<HerokuClient, S3Factory, SystemRunner> {
    Installer::new(
        HerokuClient::new(config.api_key()),
        S3Factory::default(),
        SystemRunner,
        workdir,
    )
}
