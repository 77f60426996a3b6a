//! Configuration system for podgate.
//!
//! This module provides the configuration structures and CLI definitions for the
//! podgate application. Configuration loading and precedence merging is handled by
//! the `ortho_config` crate. Precedence: CLI flags override environment
//! variables, which override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/podgate/config.toml` by default.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_socket = "unix:///run/user/1000/podman/podman.sock"
//! engine_api_version = "1.43"
//!
//! [engine_tls]
//! verify = false
//!
//! [server]
//! listen_addr = "0.0.0.0:8080"
//! static_dir = "/usr/share/podgate/static"
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, EngineTlsConfig, ServerConfig};
