//! Launchpad — provision, build and deploy an app on the hosting platform.
//!
//! # Usage
//!
//! ```text
//! launchpad install <app> [--all] [--workers N] [--s3-id ID --s3-key KEY]
//!                         [--mailchimp-api-key KEY] [--repo URL] [--account NAME]
//!                         [--workdir DIR] [--plan]
//! launchpad addons <app> [--addon NAME]...
//! launchpad env <app>
//! ```
//!
//! The platform API key comes from `--api-key`, `HEROKU_API_KEY`, or the
//! config file (`~/.launchpad.yaml` unless `--config` is given).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{addons::AddonsArgs, env::EnvArgs, install::InstallArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "launchpad",
    version,
    about = "Provision, build and deploy an app on the hosting platform",
    long_about = None,
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the app, build the checkout and deploy it.
    Install(InstallArgs),

    /// Install optional add-ons on an existing app.
    Addons(AddonsArgs),

    /// Print the environment file for an existing app.
    Env(EnvArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("LAUNCHPAD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    match cli.command {
        Commands::Install(args) => args.run(),
        Commands::Addons(args) => args.run(),
        Commands::Env(args) => args.run(),
    }
}
