use crate::config::{BackendConfig, FrontendConfig};
use crate::revision;
use crate::runner::CommandRunner;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// What the rebuild gate decided for the frontend.
#[derive(Debug, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// Install + build ran and the marker was stamped with the new revision.
    Rebuilt,
    /// Output directory exists and the stored marker matches HEAD.
    UpToDate,
}

/// Rebuild the frontend when its build output is missing or was produced
/// from a different commit than the current HEAD.
///
/// A failed install or build aborts without touching the marker, so the
/// next run retries. A marker write failure after a successful build is
/// logged and swallowed: the artifacts are valid, the next run just
/// rebuilds needlessly.
pub fn prepare_frontend(
    config: &FrontendConfig,
    runner: &dyn CommandRunner,
    latest: &str,
) -> Result<PrepareOutcome> {
    let output_path = config.dir.join(&config.output_dir);
    let marker_path = config.dir.join(&config.marker_file);

    if output_path.exists() {
        match revision::read_marker(&marker_path) {
            Some(stored) if stored == latest => {
                println!("  {} frontend build is current", "skip".green());
                return Ok(PrepareOutcome::UpToDate);
            }
            Some(_) => {
                println!("  {} new revision detected, rebuilding", "build".yellow());
            }
            None => {
                println!("  {} revision marker missing, rebuilding", "build".yellow());
            }
        }
    } else {
        println!(
            "  {} no build output at {}, building",
            "build".yellow(),
            output_path.display()
        );
    }

    rebuild_frontend(&config.dir, runner)?;

    if let Err(e) = revision::write_marker(&marker_path, latest) {
        println!(
            "{}",
            format!("  warning: could not record revision: {:#}", e).yellow()
        );
    }

    Ok(PrepareOutcome::Rebuilt)
}

fn rebuild_frontend(dir: &Path, runner: &dyn CommandRunner) -> Result<()> {
    println!("  installing frontend dependencies...");
    runner.run(dir, "bun", &["install"])?;
    println!("  building frontend...");
    runner.run(dir, "bun", &["run", "build"])?;
    Ok(())
}

/// Backend dependencies are reinstalled on every run; there is no build
/// artifact to gate on.
pub fn prepare_backend(config: &BackendConfig, runner: &dyn CommandRunner) -> Result<()> {
    println!("  installing backend dependencies...");
    runner.run(&config.dir, "bun", &["install"])
}
