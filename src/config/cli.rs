//! Command-line argument definitions for podgate.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Command-line interface for podgate.
#[derive(Debug, Parser)]
#[command(name = "podgate")]
#[command(
    author,
    version,
    about = "HTTP gateway for listing, pulling, and running containers"
)]
pub struct Cli {
    /// Subcommand to execute. Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Container engine socket path or URL.
    #[arg(long, global = true)]
    pub engine_socket: Option<String>,
}

impl Cli {
    /// Return the selected subcommand, falling back to `serve`.
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}

/// Available subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Serve the HTTP gateway.
    Serve,

    /// Connect to the container engine and verify it responds.
    Check,
}
