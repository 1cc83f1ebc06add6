use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Seam for every directory-scoped tool invocation (installs, builds, test
/// doubles). Launching long-running services goes through the supervisor
/// instead, which needs the child handle.
pub trait CommandRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()>;
}

/// Production runner: blocks until the child exits, inheriting stdio so the
/// tool's own output lands on the console.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, dir: &Path, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .args(args)
            .current_dir(dir)
            .status()?;
        if !status.success() {
            anyhow::bail!(
                "{} {} failed with exit code: {}",
                program,
                args.join(" "),
                status.code().unwrap_or(-1)
            );
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Records every invocation; fails those whose `program args` line is
    /// listed in `failures`.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: RefCell<Vec<String>>,
        pub failures: Vec<String>,
    }

    impl RecordingRunner {
        pub fn failing(failures: &[&str]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                failures: failures.iter().map(|s| s.to_string()).collect(),
            }
        }

        pub fn commands(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, _dir: &Path, program: &str, args: &[&str]) -> Result<()> {
            let line = format!("{} {}", program, args.join(" "));
            self.calls.borrow_mut().push(line.clone());
            if self.failures.contains(&line) {
                anyhow::bail!("{} failed", line);
            }
            Ok(())
        }
    }
}
