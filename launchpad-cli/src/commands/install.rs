//! `launchpad install <app>` — full provisioning, local setup and deploy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use launchpad_core::InstallationConfig;
use launchpad_install::{plan, RunReport};

use super::options::{installer, AppOptions};

/// Arguments for `launchpad install`.
#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub app: AppOptions,

    /// Directory the checkout is cloned into.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub workdir: PathBuf,

    /// Print the steps that would run and exit without doing anything.
    #[arg(long)]
    pub plan: bool,
}

impl InstallArgs {
    pub fn run(self) -> Result<()> {
        let config = self.app.resolve()?;

        if self.plan {
            print_plan(&config);
            return Ok(());
        }

        let workdir = self
            .workdir
            .canonicalize()
            .with_context(|| format!("cannot resolve workdir '{}'", self.workdir.display()))?;

        let mut stdout = std::io::stdout().lock();
        let report = installer(&config, &workdir)
            .run(&config, &mut stdout)
            .with_context(|| format!("installation of '{}' stopped", config.app_name()))?;
        drop(stdout);

        print_report(&report);
        Ok(())
    }
}

fn print_plan(config: &InstallationConfig) {
    println!("Plan for '{}':", config.app_name());
    for planned in plan(config) {
        let step = format!("{:<18}", planned.step.to_string());
        match planned.action {
            Some(action) => println!("  {} {}", step.bold(), action),
            None => println!("  {} {}", step.dimmed(), "skipped".dimmed()),
        }
    }
}

fn print_report(report: &RunReport) {
    eprintln!();
    eprintln!(
        "{} '{}' deployed ({})",
        "✓".green(),
        report.app.name,
        report.state
    );
    let addons: Vec<&str> = report.addons.iter().map(|a| a.as_str()).collect();
    eprintln!("  add-ons:  {}", addons.join(", "));
    if let Some(bucket) = &report.bucket {
        eprintln!("  bucket:   {bucket}");
    }
    eprintln!("  env file: {}", report.env_path.display());
    if let Some(path) = &report.procfile_path {
        eprintln!("  procfile: {}", path.display());
    }
    match report.workers_scaled {
        Some(count) => eprintln!("  workers:  {count}"),
        None => eprintln!("  workers:  {}", "default".dimmed()),
    }
    if !report.skipped.is_empty() {
        let skipped: Vec<String> = report.skipped.iter().map(|s| s.to_string()).collect();
        eprintln!("  skipped:  {}", skipped.join(", ").dimmed());
    }
}
