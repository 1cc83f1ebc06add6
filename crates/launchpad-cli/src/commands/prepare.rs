use anyhow::{Context, Result};
use colored::Colorize;
use launchpad_core::config::{self, LaunchpadConfig};
use launchpad_core::prepare;
use launchpad_core::revision;
use launchpad_core::runner::ShellRunner;
use launchpad_core::toolchain;
use std::path::Path;

/// The `up` flow without the launch phase: useful for warming a checkout
/// before handing it to someone, or from CI.
pub fn run() -> Result<()> {
    let config = LaunchpadConfig::load_or_default(Path::new("."))?;

    config::load_env(&config.env_path())?;
    toolchain::ensure().context("toolchain unavailable")?;

    let latest = revision::latest_commit(&config.repo_dir)?;

    let runner = ShellRunner;

    println!("{}", "Frontend".bold());
    prepare::prepare_frontend(&config.frontend, &runner, &latest)?;

    println!("{}", "Backend".bold());
    prepare::prepare_backend(&config.backend, &runner)?;

    println!("{}", "Both services ready to start.".green().bold());
    Ok(())
}
