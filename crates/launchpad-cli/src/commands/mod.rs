pub mod doctor;
pub mod free;
pub mod prepare;
pub mod up;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "launchpad", version, about = "Local dev-environment bootstrapper: toolchain check, commit-gated frontend rebuild, port reclaim, service supervision")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prepare both services and run them under supervision
    Up,
    /// Prepare only: toolchain, rebuild gate, dependency install
    Prepare,
    /// Evict whatever process holds a port
    Free {
        /// Port number to reclaim
        port: u16,
    },
    /// Check project layout, tools, and build freshness
    Doctor,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Up => up::run(),
        Commands::Prepare => prepare::run(),
        Commands::Free { port } => free::run(port),
        Commands::Doctor => doctor::run(),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "launchpad", &mut std::io::stdout());
            Ok(())
        }
    }
}
