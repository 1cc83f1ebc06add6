use anyhow::{Context, Result};
use std::fmt;
use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceName {
    Frontend,
    Backend,
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceName::Frontend => write!(f, "Frontend"),
            ServiceName::Backend => write!(f, "Backend"),
        }
    }
}

struct Service {
    name: ServiceName,
    child: Child,
}

/// Holds the child handles of the launched services so they can be reaped
/// and torn down together instead of leaking as orphans.
#[derive(Default)]
pub struct Supervisor {
    services: Vec<Service>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a service command in its directory and keep the handle.
    /// The child inherits stdio, so server logs land on the console.
    pub fn launch(
        &mut self,
        name: ServiceName,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<()> {
        let child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start {}", name))?;
        self.services.push(Service { name, child });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Block until any supervised child exits, returning its name and exit
    /// code. `None` when nothing is running.
    pub fn wait_any(&mut self) -> Option<(ServiceName, Option<i32>)> {
        if self.services.is_empty() {
            return None;
        }
        loop {
            for i in 0..self.services.len() {
                if let Ok(Some(status)) = self.services[i].child.try_wait() {
                    let service = self.services.remove(i);
                    return Some((service.name, status.code()));
                }
            }
            std::thread::sleep(Duration::from_millis(500));
        }
    }

    /// Kill and reap every remaining child.
    pub fn shutdown(&mut self) {
        for service in &mut self.services {
            let _ = service.child.kill();
            let _ = service.child.wait();
        }
        self.services.clear();
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Readiness probe: a service counts as up once its port accepts a TCP
/// connection. Bounded, so a service that crashes on startup does not hang
/// the bootstrapper.
pub fn wait_for_ready(port: u16, timeout: Duration) -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let start = Instant::now();
    loop {
        if TcpStream::connect_timeout(&addr, Duration::from_millis(500)).is_ok() {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        std::thread::sleep(Duration::from_millis(500));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_display() {
        assert_eq!(ServiceName::Frontend.to_string(), "Frontend");
        assert_eq!(ServiceName::Backend.to_string(), "Backend");
    }

    #[test]
    fn launch_missing_program_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut supervisor = Supervisor::new();
        let result = supervisor.launch(
            ServiceName::Frontend,
            dir.path(),
            "launchpad-no-such-tool",
            &[],
        );
        assert!(result.is_err());
        assert!(supervisor.is_empty());
    }

    #[test]
    fn wait_any_on_empty_supervisor_is_none() {
        let mut supervisor = Supervisor::new();
        assert!(supervisor.wait_any().is_none());
    }

    #[test]
    #[cfg(unix)]
    fn wait_any_reports_exited_child() {
        let dir = tempfile::tempdir().unwrap();
        let mut supervisor = Supervisor::new();
        supervisor
            .launch(ServiceName::Backend, dir.path(), "true", &[])
            .unwrap();

        let (name, code) = supervisor.wait_any().unwrap();
        assert_eq!(name, ServiceName::Backend);
        assert_eq!(code, Some(0));
        assert!(supervisor.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn shutdown_kills_long_running_children() {
        let dir = tempfile::tempdir().unwrap();
        let mut supervisor = Supervisor::new();
        supervisor
            .launch(ServiceName::Frontend, dir.path(), "sleep", &["30"])
            .unwrap();

        supervisor.shutdown();
        assert!(supervisor.is_empty());
    }

    #[test]
    fn wait_for_ready_succeeds_with_listener() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(wait_for_ready(port, Duration::from_secs(2)));
    }

    #[test]
    fn wait_for_ready_times_out_without_listener() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(!wait_for_ready(port, Duration::from_millis(600)));
    }
}
