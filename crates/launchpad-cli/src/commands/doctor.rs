use anyhow::Result;
use colored::Colorize;
use launchpad_core::config::LaunchpadConfig;
use launchpad_core::ports;
use launchpad_core::revision;
use std::path::Path;
use std::process::Command;

#[allow(dead_code)]
struct CheckResult {
    name: String,
    passed: bool,
    message: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
        }
    }

    fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
        }
    }
}

fn check_launchpad_toml() -> CheckResult {
    let path = Path::new("launchpad.toml");
    if !path.exists() {
        return CheckResult::pass("Config", "no launchpad.toml, using defaults");
    }
    match std::fs::read_to_string(path) {
        Ok(content) => match content.parse::<toml::Table>() {
            Ok(_) => CheckResult::pass("Config", "launchpad.toml found and valid"),
            Err(e) => {
                CheckResult::fail("Config", format!("launchpad.toml has invalid TOML: {}", e))
            }
        },
        Err(e) => CheckResult::fail("Config", format!("launchpad.toml unreadable: {}", e)),
    }
}

fn check_frontend_structure(config: &LaunchpadConfig) -> CheckResult {
    let package = config.frontend.dir.join("package.json");
    if package.exists() {
        CheckResult::pass("Frontend", "Frontend structure OK")
    } else {
        CheckResult::fail(
            "Frontend",
            format!("Missing: {}", package.display()),
        )
    }
}

fn check_backend_structure(config: &LaunchpadConfig) -> CheckResult {
    let package = config.backend.dir.join("package.json");
    if package.exists() {
        CheckResult::pass("Backend", "Backend structure OK")
    } else {
        CheckResult::fail(
            "Backend",
            format!("Missing: {}", package.display()),
        )
    }
}

fn check_env_file(config: &LaunchpadConfig) -> CheckResult {
    let path = config.env_path();
    if path.exists() {
        CheckResult::pass("Env", format!("{} present", path.display()))
    } else {
        CheckResult::fail(
            "Env",
            format!("{} not found (copy from .env.example)", path.display()),
        )
    }
}

fn check_tool(name: &str, args: &[&str], label: &str, install_hint: &str) -> CheckResult {
    match Command::new(name).args(args).output() {
        Ok(output) => {
            if output.status.success() {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                let short = version
                    .split_whitespace()
                    .next()
                    .unwrap_or(&version);
                CheckResult::pass(label, format!("{} ({})", label, short))
            } else {
                CheckResult::fail(label, format!("{} found but returned error", label))
            }
        }
        Err(_) => CheckResult::fail(
            label,
            format!("{} not found (install: {})", label, install_hint),
        ),
    }
}

fn check_repository(config: &LaunchpadConfig) -> CheckResult {
    match revision::latest_commit(&config.repo_dir) {
        Ok(rev) => CheckResult::pass("Repository", format!("HEAD at {}", &rev[..8.min(rev.len())])),
        Err(e) => CheckResult::fail(
            "Repository",
            format!("{} is not a usable git repository: {:#}", config.repo_dir.display(), e),
        ),
    }
}

fn check_build_freshness(config: &LaunchpadConfig) -> CheckResult {
    if !config.output_path().exists() {
        return CheckResult::fail("Build", "no frontend build output (run: launchpad prepare)");
    }
    let latest = match revision::latest_commit(&config.repo_dir) {
        Ok(rev) => rev,
        Err(_) => return CheckResult::fail("Build", "cannot compare marker without a repository"),
    };
    match revision::read_marker(&config.marker_path()) {
        Some(stored) if stored == latest => CheckResult::pass("Build", "frontend build is current"),
        Some(stored) => CheckResult::fail(
            "Build",
            format!(
                "frontend built from {}, HEAD is {}",
                &stored[..8.min(stored.len())],
                &latest[..8.min(latest.len())]
            ),
        ),
        None => CheckResult::fail("Build", "revision marker missing or unreadable"),
    }
}

fn check_ports(config: &LaunchpadConfig) -> Vec<CheckResult> {
    [
        ("Frontend port", config.frontend.port),
        ("Backend port", config.backend.port),
    ]
    .into_iter()
    .map(|(label, port)| {
        if ports::is_port_free(port) {
            CheckResult::pass(label, format!("port {} is free", port))
        } else {
            CheckResult::pass(
                label,
                format!("port {} is in use (launchpad up will reclaim it)", port),
            )
        }
    })
    .collect()
}

pub fn run() -> Result<()> {
    println!("{}", "Launchpad Doctor".bold());
    println!();

    let config = LaunchpadConfig::load_or_default(Path::new("."))?;

    println!("{}", "Project Structure".bold().underline());
    let structure_checks = vec![
        check_launchpad_toml(),
        check_frontend_structure(&config),
        check_backend_structure(&config),
        check_env_file(&config),
        check_repository(&config),
    ];
    print_checks(&structure_checks);

    println!();
    println!("{}", "Development Tools".bold().underline());
    let tool_checks = vec![
        check_tool("bun", &["--version"], "Bun", "https://bun.sh"),
        check_tool("git", &["--version"], "Git", "https://git-scm.com"),
    ];
    print_checks(&tool_checks);

    println!();
    println!("{}", "Build & Ports".bold().underline());
    let mut runtime_checks = vec![check_build_freshness(&config)];
    runtime_checks.extend(check_ports(&config));
    print_checks(&runtime_checks);

    let all_checks: Vec<&CheckResult> = structure_checks
        .iter()
        .chain(tool_checks.iter())
        .chain(runtime_checks.iter())
        .collect();

    let total = all_checks.len();
    let passed = all_checks.iter().filter(|c| c.passed).count();
    let failed = total - passed;

    println!();
    let summary = format!("{}/{} checks passed", passed, total);
    if failed == 0 {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.yellow().bold());
        println!(
            "{}",
            format!("{} issue(s) found — see above for details", failed).yellow()
        );
    }

    Ok(())
}

fn print_checks(checks: &[CheckResult]) {
    for check in checks {
        if check.passed {
            println!("  {} {}", "\u{2713}".green(), check.message);
        } else {
            println!("  {} {}", "\u{2717}".red(), check.message);
        }
    }
}
