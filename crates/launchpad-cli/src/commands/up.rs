use anyhow::{Context, Result};
use colored::Colorize;
use launchpad_core::config::{self, LaunchpadConfig};
use launchpad_core::ports::{self, PortInspector};
use launchpad_core::prepare;
use launchpad_core::revision;
use launchpad_core::runner::ShellRunner;
use launchpad_core::supervisor::{self, ServiceName, Supervisor};
use launchpad_core::toolchain;
use std::path::Path;
use std::time::Duration;

const RECLAIM_TIMEOUT: Duration = Duration::from_secs(5);
const READY_TIMEOUT: Duration = Duration::from_secs(30);

pub fn run() -> Result<()> {
    let config = LaunchpadConfig::load_or_default(Path::new("."))?;

    config::load_env(&config.env_path())?;
    toolchain::ensure().context("toolchain unavailable")?;

    let latest = revision::latest_commit(&config.repo_dir)?;
    println!("HEAD is {}", short(&latest).bold());

    let runner = ShellRunner;

    println!("{}", "Frontend".bold());
    if let Err(e) = prepare::prepare_frontend(&config.frontend, &runner, &latest) {
        println!(
            "{}",
            format!("  frontend build failed, serving stale output: {:#}", e).red()
        );
    }

    println!("{}", "Backend".bold());
    if let Err(e) = prepare::prepare_backend(&config.backend, &runner) {
        println!(
            "{}",
            format!("  backend dependency install failed: {:#}", e).red()
        );
    }

    let inspector = ports::system_inspector();
    let mut supervisor = Supervisor::new();

    let env_flag = format!("--env-file={}", config.backend.env_file);
    start_service(
        &mut supervisor,
        inspector.as_ref(),
        ServiceName::Frontend,
        &config.frontend.dir,
        config.frontend.port,
        "bun",
        &["run", "preview"],
    );
    start_service(
        &mut supervisor,
        inspector.as_ref(),
        ServiceName::Backend,
        &config.backend.dir,
        config.backend.port,
        "bun",
        &[&env_flag, "run", "start"],
    );

    if supervisor.is_empty() {
        anyhow::bail!("no service could be started");
    }

    probe(ServiceName::Frontend, config.frontend.port);
    probe(ServiceName::Backend, config.backend.port);

    // Park until a service dies, then tear the rest down.
    if let Some((name, code)) = supervisor.wait_any() {
        println!(
            "{}",
            format!(
                "{} exited (code {}), shutting down",
                name,
                code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
            )
            .red()
        );
    }
    supervisor.shutdown();
    Ok(())
}

fn start_service(
    supervisor: &mut Supervisor,
    inspector: &dyn PortInspector,
    name: ServiceName,
    dir: &Path,
    port: u16,
    program: &str,
    args: &[&str],
) {
    if let Err(e) = ports::reclaim(inspector, port, RECLAIM_TIMEOUT) {
        println!(
            "{}",
            format!("  could not free port {} for {}: {:#}", port, name, e).red()
        );
    }

    println!("{}: starting...", name);
    if let Err(e) = supervisor.launch(name, dir, program, args) {
        println!("{}", format!("{}: failed to start: {:#}", name, e).red());
    }
}

fn probe(name: ServiceName, port: u16) {
    if supervisor::wait_for_ready(port, READY_TIMEOUT) {
        println!(
            "{}",
            format!("{}: active on port {}", name, port).green()
        );
    } else {
        println!(
            "{}",
            format!("{}: not answering on port {} yet", name, port).yellow()
        );
    }
}

fn short(rev: &str) -> &str {
    &rev[..rev.len().min(8)]
}
