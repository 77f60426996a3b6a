//! Explicit container engine settings resolved once at start-up.
//!
//! The Docker client convention configures endpoints, TLS material, and API
//! version pins through environment variables. Podgate reads them exactly once,
//! merges them with [`AppConfig`], and hands the resulting [`EngineSettings`]
//! to every request by reference.

use std::fmt;
use std::str::FromStr;

use bollard::ClientVersion;
use camino::{Utf8Path, Utf8PathBuf};

use super::{EngineConnector, SocketResolver};
use crate::config::AppConfig;
use crate::error::{ConfigError, PodgateError};

/// Pins the engine API version, bypassing negotiation.
const DOCKER_API_VERSION: &str = "DOCKER_API_VERSION";

/// Any non-empty value enables TLS.
const DOCKER_TLS_VERIFY: &str = "DOCKER_TLS_VERIFY";

/// Directory holding `ca.pem`, `cert.pem`, and `key.pem`.
const DOCKER_CERT_PATH: &str = "DOCKER_CERT_PATH";

/// An engine API version in `MAJOR.MINOR` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    major: usize,
    minor: usize,
}

impl ApiVersion {
    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: usize, minor: usize) -> Self {
        Self { major, minor }
    }

    /// Convert into the client version type `Bollard` expects.
    #[must_use]
    pub const fn client_version(self) -> ClientVersion {
        ClientVersion {
            major_version: self.major,
            minor_version: self.minor,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let version = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let Some((major, minor)) = version.split_once('.') else {
            return Err(format!("expected MAJOR.MINOR, got '{raw}'"));
        };

        let parse_part = |part: &str| {
            part.parse::<usize>()
                .map_err(|_| format!("expected MAJOR.MINOR, got '{raw}'"))
        };

        Ok(Self::new(parse_part(major)?, parse_part(minor)?))
    }
}

/// Client certificate material for TLS engine connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    cert_dir: Utf8PathBuf,
}

impl TlsMaterial {
    /// Use the Docker-convention file names inside `cert_dir`.
    #[must_use]
    pub fn from_cert_dir(cert_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            cert_dir: cert_dir.into(),
        }
    }

    /// Return the certificate directory.
    #[must_use]
    pub fn cert_dir(&self) -> &Utf8Path {
        &self.cert_dir
    }

    /// Path to the certificate authority bundle.
    #[must_use]
    pub fn ca(&self) -> Utf8PathBuf {
        self.cert_dir.join("ca.pem")
    }

    /// Path to the client certificate.
    #[must_use]
    pub fn cert(&self) -> Utf8PathBuf {
        self.cert_dir.join("cert.pem")
    }

    /// Path to the client private key.
    #[must_use]
    pub fn key(&self) -> Utf8PathBuf {
        self.cert_dir.join("key.pem")
    }
}

/// Everything needed to open a connection to the container engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    endpoint: String,
    api_version: Option<ApiVersion>,
    tls: Option<TlsMaterial>,
}

impl EngineSettings {
    /// Settings for a plain endpoint with version negotiation.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_version: None,
            tls: None,
        }
    }

    /// Pin the API version instead of negotiating.
    #[must_use]
    pub const fn with_api_version(mut self, api_version: Option<ApiVersion>) -> Self {
        self.api_version = api_version;
        self
    }

    /// Attach TLS material.
    #[must_use]
    pub fn with_tls(mut self, tls: Option<TlsMaterial>) -> Self {
        self.tls = tls;
        self
    }

    /// Return the engine endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Return the pinned API version, if any.
    #[must_use]
    pub const fn api_version(&self) -> Option<ApiVersion> {
        self.api_version
    }

    /// Return the TLS material, if TLS is enabled.
    #[must_use]
    pub const fn tls(&self) -> Option<&TlsMaterial> {
        self.tls.as_ref()
    }

    /// Resolve settings from configuration and the Docker environment convention.
    ///
    /// Resolution order for each setting:
    /// - endpoint: `engine_socket`, then `DOCKER_HOST`, `CONTAINER_HOST`,
    ///   `PODMAN_HOST`, then the platform default socket
    /// - API version: `engine_api_version`, then `DOCKER_API_VERSION`
    /// - TLS: enabled by `engine_tls.verify` or a non-empty `DOCKER_TLS_VERIFY`;
    ///   certificates from `engine_tls.cert_path`, then `DOCKER_CERT_PATH`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed API version and
    /// `ConfigError::MissingRequired` when TLS is enabled without a
    /// certificate directory.
    pub fn resolve<E: mockable::Env>(config: &AppConfig, env: &E) -> Result<Self, PodgateError> {
        let resolver = SocketResolver::new(env);
        let endpoint = EngineConnector::resolve_socket(config.engine_socket.as_deref(), &resolver);
        let api_version = resolve_api_version(config, env)?;
        let tls = resolve_tls(config, env)?;

        Ok(Self::new(endpoint)
            .with_api_version(api_version)
            .with_tls(tls))
    }
}

fn non_empty_env<E: mockable::Env>(env: &E, key: &str) -> Option<String> {
    env.string(key).filter(|value| !value.trim().is_empty())
}

fn resolve_api_version<E: mockable::Env>(
    config: &AppConfig,
    env: &E,
) -> Result<Option<ApiVersion>, PodgateError> {
    let configured = config
        .engine_api_version
        .clone()
        .filter(|value| !value.trim().is_empty())
        .map(|value| ("engine_api_version", value));
    let source = configured.or_else(|| {
        non_empty_env(env, DOCKER_API_VERSION).map(|value| (DOCKER_API_VERSION, value))
    });

    let Some((field, raw)) = source else {
        return Ok(None);
    };

    raw.parse::<ApiVersion>().map(Some).map_err(|reason| {
        PodgateError::from(ConfigError::InvalidValue {
            field: String::from(field),
            reason,
        })
    })
}

fn resolve_tls<E: mockable::Env>(
    config: &AppConfig,
    env: &E,
) -> Result<Option<TlsMaterial>, PodgateError> {
    let enabled = config.engine_tls.verify || non_empty_env(env, DOCKER_TLS_VERIFY).is_some();
    if !enabled {
        return Ok(None);
    }

    config
        .engine_tls
        .cert_path
        .clone()
        .or_else(|| non_empty_env(env, DOCKER_CERT_PATH).map(Utf8PathBuf::from))
        .map(|dir| Some(TlsMaterial::from_cert_dir(dir)))
        .ok_or_else(|| {
            PodgateError::from(ConfigError::MissingRequired {
                field: String::from("engine_tls.cert_path"),
            })
        })
}
