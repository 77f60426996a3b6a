//! Socket resolution and container engine connection.
//!
//! This module resolves container engine socket endpoints from multiple sources
//! (configuration, environment variables, platform defaults) and opens `Bollard`
//! clients from resolved [`EngineSettings`], negotiating the API version when
//! none is pinned.

mod error_classification;
mod health_check;
mod operations;

use bollard::{ClientVersion, Docker};
use tracing::debug;

use self::error_classification::{classify_connection_error, classify_negotiation_error};
use super::client::{ConnectEngine, EngineClient, OpenClientFuture};
use super::settings::{EngineSettings, TlsMaterial};
use crate::error::PodgateError;

pub use operations::CreateContainerRequest;

/// Environment variable names checked in fallback order after configuration sources.
const FALLBACK_ENV_VARS: &[&str] = &["DOCKER_HOST", "CONTAINER_HOST", "PODMAN_HOST"];

/// Connection timeout in seconds for Docker/Podman API connections.
const CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Timeout in seconds for health check operations.
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

/// Default socket path for Unix platforms.
#[cfg(unix)]
const DEFAULT_SOCKET: &str = "unix:///var/run/docker.sock";

/// Default socket path for Windows platforms.
#[cfg(windows)]
const DEFAULT_SOCKET: &str = "npipe:////./pipe/docker_engine";

/// Resolves container engine socket endpoints from environment variables.
///
/// The resolver checks a prioritized list of environment variables to find
/// the socket endpoint when no explicit configuration is provided.
///
/// # Example
///
/// ```ignore
/// use mockable::DefaultEnv;
/// use podgate::engine::SocketResolver;
///
/// let env = DefaultEnv::new();
/// let resolver = SocketResolver::new(&env);
///
/// if let Some(socket) = resolver.resolve_from_env() {
///     tracing::info!(%socket, "found engine socket");
/// }
/// ```
pub struct SocketResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> SocketResolver<'a, E> {
    /// Creates a new socket resolver with the given environment provider.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves the socket endpoint from fallback environment variables.
    ///
    /// Checks `DOCKER_HOST`, `CONTAINER_HOST`, then `PODMAN_HOST`, skipping
    /// empty values. Returns `None` if none is set.
    #[must_use]
    pub fn resolve_from_env(&self) -> Option<String> {
        FALLBACK_ENV_VARS
            .iter()
            .filter_map(|var_name| self.env.string(var_name))
            .find(|value| !value.is_empty())
    }

    /// Returns the platform default socket path.
    #[must_use]
    pub const fn default_socket() -> &'static str {
        DEFAULT_SOCKET
    }
}

/// Classifies socket endpoint types for connection handling.
enum SocketType {
    /// Unix socket or Windows named pipe with explicit scheme.
    Socket,
    /// HTTP, HTTPS, or TCP endpoint (TCP is rewritten to HTTP).
    Http,
    /// Bare path without scheme prefix.
    BarePath,
}

impl SocketType {
    fn is_socket_scheme(socket: &str) -> bool {
        socket.starts_with("unix://") || socket.starts_with("npipe://")
    }

    fn is_http_scheme(socket: &str) -> bool {
        socket.starts_with("tcp://")
            || socket.starts_with("http://")
            || socket.starts_with("https://")
    }

    fn classify(socket: &str) -> Self {
        match (Self::is_socket_scheme(socket), Self::is_http_scheme(socket)) {
            (true, _) => Self::Socket,
            (_, true) => Self::Http,
            _ => Self::BarePath,
        }
    }
}

/// Opens connections to Docker or Podman container engines.
///
/// A connector owns the [`EngineSettings`] resolved at start-up. Each call to
/// [`ConnectEngine::open`] produces a fresh client; dropping the client
/// releases its connection pool.
#[derive(Debug, Clone)]
pub struct EngineConnector {
    settings: EngineSettings,
}

impl EngineConnector {
    /// Create a connector for the given settings.
    #[must_use]
    pub const fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Return the settings this connector dials with.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Connect to the container engine at the specified socket path.
    ///
    /// Supports the following endpoint formats:
    /// - Unix sockets: `unix:///path/to/socket`
    /// - Windows named pipes: `npipe:////./pipe/name`
    /// - TCP: `tcp://host:port` (treated as HTTP connection)
    /// - HTTP: `http://host:port`
    /// - HTTPS: `https://host:port`
    /// - Bare paths: paths starting with `\\` or `//` are treated as Windows
    ///   named pipes; all other paths are treated as Unix sockets.
    ///
    /// No request is sent; the client is only configured.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::SocketNotFound`, `PermissionDenied`, or
    /// `ConnectionFailed` if the client cannot be configured.
    pub fn connect(socket: &str, version: &ClientVersion) -> Result<Docker, PodgateError> {
        let result = match SocketType::classify(socket) {
            SocketType::Socket => {
                Docker::connect_with_socket(socket, CONNECTION_TIMEOUT_SECS, version)
                    .map_err(|e| classify_connection_error(&e, socket))
            }
            SocketType::Http => {
                // Rewrite tcp:// to http:// for Bollard compatibility
                let http_socket = if socket.starts_with("tcp://") {
                    socket.replacen("tcp://", "http://", 1)
                } else {
                    socket.to_owned()
                };
                Docker::connect_with_http(&http_socket, CONNECTION_TIMEOUT_SECS, version)
                    .map_err(|e| classify_connection_error(&e, &http_socket))
            }
            SocketType::BarePath => {
                let socket_uri = Self::normalize_bare_path(socket);
                Docker::connect_with_socket(&socket_uri, CONNECTION_TIMEOUT_SECS, version)
                    .map_err(|e| classify_connection_error(&e, &socket_uri))
            }
        };

        result.map_err(PodgateError::from)
    }

    /// Connect to a TLS-protected engine endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ConnectionFailed` if the certificate material
    /// cannot be loaded or the client cannot be configured.
    #[cfg(feature = "tls")]
    pub fn connect_tls(
        endpoint: &str,
        tls: &TlsMaterial,
        version: &ClientVersion,
    ) -> Result<Docker, PodgateError> {
        Docker::connect_with_ssl(
            endpoint,
            tls.key().as_std_path(),
            tls.cert().as_std_path(),
            tls.ca().as_std_path(),
            CONNECTION_TIMEOUT_SECS,
            version,
        )
        .map_err(|e| PodgateError::from(classify_connection_error(&e, endpoint)))
    }

    /// Connect to a TLS-protected engine endpoint.
    ///
    /// # Errors
    ///
    /// Always returns `ContainerError::TlsUnavailable`; TLS support is a
    /// compile-time feature.
    #[cfg(not(feature = "tls"))]
    pub fn connect_tls(
        endpoint: &str,
        _tls: &TlsMaterial,
        _version: &ClientVersion,
    ) -> Result<Docker, PodgateError> {
        Err(PodgateError::from(crate::error::ContainerError::TlsUnavailable {
            endpoint: endpoint.to_owned(),
        }))
    }

    /// Normalize a bare socket path to a URI with the appropriate scheme.
    ///
    /// Detection is based on path syntax, not the current platform: `//some/path`
    /// is treated as a named pipe even on Unix.
    fn normalize_bare_path(path: &str) -> String {
        if path.starts_with("\\\\") || path.starts_with("//") {
            format!("npipe://{path}")
        } else {
            format!("unix://{path}")
        }
    }

    /// Resolves the socket endpoint without establishing a connection.
    ///
    /// Resolution order:
    /// 1. `config_socket` (from CLI, config file, or `PODGATE_ENGINE_SOCKET`)
    /// 2. `DOCKER_HOST`, `CONTAINER_HOST`, `PODMAN_HOST` (via resolver)
    /// 3. Platform default socket
    #[must_use]
    pub fn resolve_socket<E: mockable::Env>(
        config_socket: Option<&str>,
        resolver: &SocketResolver<'_, E>,
    ) -> String {
        config_socket
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| resolver.resolve_from_env())
            .unwrap_or_else(|| SocketResolver::<E>::default_socket().to_owned())
    }

    /// Configure a client from the connector's settings without contacting
    /// the engine.
    ///
    /// Uses the pinned API version when one is configured and `Bollard`'s
    /// default otherwise.
    ///
    /// # Errors
    ///
    /// Returns the classified connection error from [`Self::connect`] or
    /// [`Self::connect_tls`].
    pub fn client(&self) -> Result<Docker, PodgateError> {
        let pinned = self.settings.api_version().map(|v| v.client_version());
        let version = pinned.as_ref().unwrap_or(bollard::API_DEFAULT_VERSION);
        let endpoint = self.settings.endpoint();

        match self.settings.tls() {
            Some(tls) => Self::connect_tls(endpoint, tls, version),
            None => Self::connect(endpoint, version),
        }
    }

    /// Open a client ready for engine calls (async version).
    ///
    /// Without a pinned API version the client negotiates with the engine,
    /// which is the first request sent over the new connection.
    ///
    /// # Errors
    ///
    /// Returns connection errors from [`Self::client`], and
    /// `ContainerError::VersionNegotiationFailed` (or a classified connection
    /// error) when negotiation fails.
    pub async fn open_async(&self) -> Result<Docker, PodgateError> {
        let docker = self.client()?;
        let endpoint = self.settings.endpoint();

        if let Some(version) = self.settings.api_version() {
            debug!(%endpoint, %version, "using pinned engine API version");
            return Ok(docker);
        }

        let negotiated = docker
            .negotiate_version()
            .await
            .map_err(|e| PodgateError::from(classify_negotiation_error(&e, endpoint)))?;
        debug!(%endpoint, version = ?negotiated.client_version(), "negotiated engine API version");
        Ok(negotiated)
    }
}

impl ConnectEngine for EngineConnector {
    fn open(&self) -> OpenClientFuture<'_> {
        Box::pin(async move {
            let docker = self.open_async().await?;
            Ok(Box::new(docker) as Box<dyn EngineClient>)
        })
    }
}
