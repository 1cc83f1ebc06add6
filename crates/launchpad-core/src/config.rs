use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct LaunchpadConfig {
    /// Git repository whose HEAD gates the frontend rebuild. Defaults to the
    /// parent directory, matching the sibling frontend/backend layout.
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_frontend_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_frontend_port")]
    pub port: u16,
    /// Build output directory, relative to `dir`. Its absence forces a rebuild.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Revision marker file, relative to `dir`.
    #[serde(default = "default_marker_file")]
    pub marker_file: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_backend_port")]
    pub port: u16,
    /// Env file, relative to `dir`. Loaded into the process environment at
    /// startup and passed to the backend start command.
    #[serde(default = "default_env_file")]
    pub env_file: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: default_frontend_dir(),
            port: default_frontend_port(),
            output_dir: default_output_dir(),
            marker_file: default_marker_file(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dir: default_backend_dir(),
            port: default_backend_port(),
            env_file: default_env_file(),
        }
    }
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from("..")
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("../frontend")
}

fn default_backend_dir() -> PathBuf {
    PathBuf::from("../backend")
}

fn default_frontend_port() -> u16 {
    3000
}

fn default_backend_port() -> u16 {
    8000
}

fn default_output_dir() -> String {
    ".output".to_string()
}

fn default_marker_file() -> String {
    "version.txt".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

impl LaunchpadConfig {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join("launchpad.toml");
        let content = std::fs::read_to_string(&path)?;
        let config: LaunchpadConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `launchpad.toml` if present, otherwise fall back to the defaults.
    /// An existing but malformed file is an error, not a silent fallback.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join("launchpad.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.frontend.dir.join(&self.frontend.output_dir)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.frontend.dir.join(&self.frontend.marker_file)
    }

    pub fn env_path(&self) -> PathBuf {
        self.backend.dir.join(&self.backend.env_file)
    }
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            repo_dir: default_repo_dir(),
            frontend: FrontendConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

/// Load the backend env file into the process environment. The services
/// inherit it, and the backend start command receives the same file by path.
pub fn load_env(path: &Path) -> Result<()> {
    dotenvy::from_path(path)
        .with_context(|| format!("failed to load env file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Helper: write a launchpad.toml and return the tempdir.
    fn write_config(toml_content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launchpad.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(toml_content.as_bytes()).unwrap();
        dir
    }

    #[test]
    fn load_valid_config() {
        let dir = write_config(
            r#"
[frontend]
dir = "web"
port = 5173

[backend]
dir = "api"
port = 9000
"#,
        );

        let config = LaunchpadConfig::load(dir.path()).unwrap();
        assert_eq!(config.frontend.dir, PathBuf::from("web"));
        assert_eq!(config.frontend.port, 5173);
        assert_eq!(config.backend.dir, PathBuf::from("api"));
        assert_eq!(config.backend.port, 9000);
    }

    #[test]
    fn defaults_match_sibling_layout() {
        let config = LaunchpadConfig::default();
        assert_eq!(config.repo_dir, PathBuf::from(".."));
        assert_eq!(config.frontend.dir, PathBuf::from("../frontend"));
        assert_eq!(config.frontend.port, 3000);
        assert_eq!(config.backend.dir, PathBuf::from("../backend"));
        assert_eq!(config.backend.port, 8000);
        assert_eq!(config.frontend.output_dir, ".output");
        assert_eq!(config.frontend.marker_file, "version.txt");
        assert_eq!(config.backend.env_file, ".env");
    }

    #[test]
    fn partial_config_fills_defaults() {
        // Only the ports are overridden; paths keep their defaults.
        let dir = write_config(
            r#"
[frontend]
port = 4000

[backend]
port = 4001
"#,
        );

        let config = LaunchpadConfig::load(dir.path()).unwrap();
        assert_eq!(config.frontend.port, 4000);
        assert_eq!(config.backend.port, 4001);
        assert_eq!(config.frontend.dir, PathBuf::from("../frontend"));
        assert_eq!(config.backend.env_file, ".env");
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LaunchpadConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.frontend.port, 3000);
        assert_eq!(config.backend.port, 8000);
    }

    #[test]
    fn load_or_default_rejects_malformed_file() {
        let dir = write_config("[frontend\nport = oops");
        assert!(LaunchpadConfig::load_or_default(dir.path()).is_err());
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LaunchpadConfig::load(dir.path()).is_err());
    }

    #[test]
    fn derived_paths_join_frontend_dir() {
        let config = LaunchpadConfig::default();
        assert_eq!(config.output_path(), PathBuf::from("../frontend/.output"));
        assert_eq!(config.marker_path(), PathBuf::from("../frontend/version.txt"));
        assert_eq!(config.env_path(), PathBuf::from("../backend/.env"));
    }

    #[test]
    fn load_env_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env(&dir.path().join(".env")).is_err());
    }

    #[test]
    fn load_env_reads_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "LAUNCHPAD_CONFIG_TEST_VAR=hello\n").unwrap();
        load_env(&path).unwrap();
        assert_eq!(
            std::env::var("LAUNCHPAD_CONFIG_TEST_VAR").unwrap(),
            "hello"
        );
    }
}
