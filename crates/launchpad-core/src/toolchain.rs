use anyhow::Result;
use colored::Colorize;
use std::process::Command;

const INSTALL_SCRIPT: &str = "curl -fsSL https://bun.sh/install | bash";

/// Check whether `bun` answers its version flag.
pub fn probe() -> bool {
    probe_tool("bun")
}

fn probe_tool(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Install bun via its upstream install script. A shell is required because
/// the script is piped from curl.
pub fn install() -> Result<()> {
    println!("{}", "bun not found, installing...".yellow());
    let status = Command::new("bash").args(["-c", INSTALL_SCRIPT]).status()?;
    if !status.success() {
        anyhow::bail!(
            "bun install script failed with exit code: {}",
            status.code().unwrap_or(-1)
        );
    }
    println!(
        "{}",
        "bun installed. Restart your shell if it is not on PATH yet.".green()
    );
    Ok(())
}

/// Make sure the toolchain is callable, installing it if necessary.
pub fn ensure() -> Result<()> {
    if probe() {
        return Ok(());
    }
    install()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_missing_tool_is_false() {
        assert!(!probe_tool("launchpad-no-such-tool"));
    }

    #[test]
    #[cfg(unix)]
    fn probe_present_tool_is_true() {
        // `bash --version` exits 0 on any unix dev box.
        assert!(probe_tool("bash"));
    }
}
