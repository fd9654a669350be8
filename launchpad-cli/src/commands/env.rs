//! `launchpad env <app>` — print the environment file of an existing app.

use anyhow::{Context, Result};
use clap::Args;

use super::options::{installer, AppOptions};

/// Arguments for `launchpad env`.
#[derive(Args, Debug)]
pub struct EnvArgs {
    #[command(flatten)]
    pub app: AppOptions,
}

impl EnvArgs {
    pub fn run(self) -> Result<()> {
        let config = self.app.resolve()?;
        let env = installer(&config, std::path::Path::new("."))
            .render_env(&config)
            .with_context(|| format!("cannot build env file for '{}'", config.app_name()))?;
        println!("{env}");
        Ok(())
    }
}
