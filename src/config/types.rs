//! Configuration data types for podgate.

use std::net::SocketAddr;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default listen address: all interfaces, port 8080.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default directory holding the static UI assets.
const DEFAULT_STATIC_DIR: &str = "static";

/// TLS settings for remote container engines.
///
/// The certificate directory follows the Docker convention and must contain
/// `ca.pem`, `cert.pem`, and `key.pem`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineTlsConfig {
    /// Require TLS when connecting to the engine.
    pub verify: bool,

    /// Directory containing the client certificate material.
    pub cert_path: Option<Utf8PathBuf>,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the gateway listens on.
    pub listen_addr: String,

    /// Directory served under `/ui/`.
    pub static_dir: Utf8PathBuf,
}

impl ServerConfig {
    /// Parse the configured listen address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `listen_addr` is not a valid
    /// socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                field: String::from("server.listen_addr"),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: String::from(DEFAULT_LISTEN_ADDR),
            static_dir: Utf8PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Engine settings recognised by the Docker client convention (`DOCKER_HOST`,
/// `DOCKER_API_VERSION`, `DOCKER_TLS_VERIFY`, `DOCKER_CERT_PATH`) are not part
/// of this structure; they are consulted once at start-up when
/// [`crate::engine::EngineSettings`] is resolved.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `PODGATE_CONFIG_PATH` environment variable
/// 2. `.podgate.toml` in the current working directory
/// 3. `.podgate.toml` in the home directory
/// 4. `~/.config/podgate/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "PODGATE",
    discovery(
        app_name = "podgate",
        env_var = "PODGATE_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".podgate.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The container engine socket path or URL.
    pub engine_socket: Option<String>,

    /// Pinned engine API version (`MAJOR.MINOR`); negotiated when absent.
    #[ortho_config(skip_cli)]
    pub engine_api_version: Option<String>,

    /// TLS settings for the engine connection.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub engine_tls: EngineTlsConfig,

    /// HTTP listener configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub server: ServerConfig,
}
