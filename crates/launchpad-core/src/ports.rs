use anyhow::Result;
use colored::Colorize;
use std::net::TcpListener;
use std::process::Command;
use std::time::{Duration, Instant};

/// OS capability for finding and evicting whatever holds a port. One impl
/// per platform; tests substitute a fake.
pub trait PortInspector {
    /// Pid of the process bound to `port`, if any.
    fn find_owner(&self, port: u16) -> Option<u32>;
    /// Forcibly terminate `pid`.
    fn terminate(&self, pid: u32) -> Result<()>;
}

/// The inspector for the platform this binary was built for.
pub fn system_inspector() -> Box<dyn PortInspector> {
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(LsofInspector)
    }
    #[cfg(target_os = "windows")]
    {
        Box::new(NetstatInspector)
    }
}

/// Linux/macOS: `lsof -ti :PORT` prints one pid per line; `kill -9` evicts.
#[cfg(not(target_os = "windows"))]
pub struct LsofInspector;

#[cfg(not(target_os = "windows"))]
impl PortInspector for LsofInspector {
    fn find_owner(&self, port: u16) -> Option<u32> {
        let output = Command::new("lsof")
            .args(["-ti", &format!(":{}", port)])
            .output()
            .ok()?;
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .lines()
            .next()?
            .parse()
            .ok()
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        let status = Command::new("kill")
            .args(["-9", &pid.to_string()])
            .status()?;
        if !status.success() {
            anyhow::bail!("kill -9 {} failed", pid);
        }
        Ok(())
    }
}

/// Windows: parse `netstat -ano` for a LISTENING entry; `taskkill /F` evicts.
#[cfg(target_os = "windows")]
pub struct NetstatInspector;

#[cfg(target_os = "windows")]
impl PortInspector for NetstatInspector {
    fn find_owner(&self, port: u16) -> Option<u32> {
        let output = Command::new("netstat").args(["-ano"]).output().ok()?;
        let output_str = String::from_utf8_lossy(&output.stdout);
        let port_str = format!(":{}", port);
        for line in output_str.lines() {
            if line.contains(&port_str) && line.contains("LISTENING") {
                if let Some(pid) = line.split_whitespace().last() {
                    if let Ok(pid) = pid.parse::<u32>() {
                        if pid != 0 {
                            return Some(pid);
                        }
                    }
                }
            }
        }
        None
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        let status = Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .status()?;
        if !status.success() {
            anyhow::bail!("taskkill /F /PID {} failed", pid);
        }
        Ok(())
    }
}

/// A port is free when we can bind it ourselves.
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}

/// Poll until the port is bindable or `timeout` elapses. The OS does not
/// release a killed occupant's socket instantly.
pub fn wait_for_port_free(port: u16, timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        if is_port_free(port) {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        std::thread::sleep(Duration::from_millis(200));
    }
}

/// Evict whatever holds `port`, then wait for the OS to actually release it.
/// A free port is a no-op. Returns an error when the occupant survives or
/// the port stays bound past the timeout.
pub fn reclaim(inspector: &dyn PortInspector, port: u16, timeout: Duration) -> Result<()> {
    let Some(pid) = inspector.find_owner(port) else {
        return Ok(());
    };

    println!(
        "{}",
        format!("  port {} is held by pid {}, terminating", port, pid).yellow()
    );
    inspector.terminate(pid)?;

    if !wait_for_port_free(port, timeout) {
        anyhow::bail!("port {} still in use after killing pid {}", port, pid);
    }
    Ok(())
}
