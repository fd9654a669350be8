//! `launchpad addons <app>` — install optional add-ons on an existing app.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::options::{installer, AppOptions};

/// Arguments for `launchpad addons`.
#[derive(Args, Debug)]
pub struct AddonsArgs {
    #[command(flatten)]
    pub app: AppOptions,
}

impl AddonsArgs {
    pub fn run(self) -> Result<()> {
        let config = self.app.resolve()?;
        let installed = installer(&config, std::path::Path::new("."))
            .install_optional_addons(&config)
            .with_context(|| format!("add-on install on '{}' stopped", config.app_name()))?;

        for addon in &installed {
            println!("{} {}", "✓".green(), addon);
        }
        Ok(())
    }
}
