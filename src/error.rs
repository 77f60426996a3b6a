//! Semantic error types for the podgate application.
//!
//! This module defines the error hierarchy for podgate, following the principle of
//! using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect, retry, or map to an HTTP status, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while talking to the container engine.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
        /// The engine client's own description of the failure.
        message: String,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
        /// The engine client's own description of the failure.
        message: String,
    },

    /// TLS material was configured but the binary was built without TLS support.
    #[error("TLS connection to {endpoint} requested but podgate was built without the `tls` feature")]
    TlsUnavailable {
        /// The endpoint that required TLS.
        endpoint: String,
    },

    /// The engine and client could not agree on an API version.
    #[error("container engine API version negotiation failed: {message}")]
    VersionNegotiationFailed {
        /// A description of the negotiation failure.
        message: String,
    },

    /// Failed to list containers.
    #[error("failed to list containers: {message}")]
    ListFailed {
        /// A description of the listing failure.
        message: String,
    },

    /// Failed to pull an image.
    #[error("failed to pull image '{image}': {message}")]
    PullFailed {
        /// The image reference that was requested.
        image: String,
        /// A description of the pull failure.
        message: String,
    },

    /// Failed to create a container.
    #[error("failed to create container: {message}")]
    CreateFailed {
        /// A description of the creation failure.
        message: String,
    },

    /// Failed to start a container.
    #[error("failed to start container '{container_id}': {message}")]
    StartFailed {
        /// The ID of the container that failed to start.
        container_id: String,
        /// A description of the start failure.
        message: String,
    },

    /// Health check failed - engine did not respond correctly.
    #[error("container engine health check failed: {message}")]
    HealthCheckFailed {
        /// A description of the health check failure.
        message: String,
    },

    /// Health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

impl ContainerError {
    /// Return the engine-facing message without podgate's context prefix.
    ///
    /// Engine failures carry the engine client's own text, which HTTP clients
    /// receive verbatim. Variants that podgate raises itself (a TLS build
    /// mismatch, health-check timeouts) have no such text and fall back to
    /// the full display string.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::ConnectionFailed { message }
            | Self::SocketNotFound { message, .. }
            | Self::PermissionDenied { message, .. }
            | Self::VersionNegotiationFailed { message }
            | Self::ListFailed { message }
            | Self::PullFailed { message, .. }
            | Self::CreateFailed { message }
            | Self::StartFailed { message, .. }
            | Self::HealthCheckFailed { message } => message.clone(),
            Self::TlsUnavailable { .. } | Self::HealthCheckTimeout { .. } => self.to_string(),
        }
    }
}

/// Errors raised while running the HTTP listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not bind to the configured address.
    #[error("failed to bind listener on {addr}: {message}")]
    BindFailed {
        /// The address that could not be bound.
        addr: String,
        /// A description of the bind failure.
        message: String,
    },

    /// The server stopped with an I/O error.
    #[error("HTTP server failed: {message}")]
    ServeFailed {
        /// A description of the failure.
        message: String,
    },
}

/// Top-level error type for the podgate application.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are converted to `eyre::Report` for human-readable reporting;
/// at the HTTP boundary they become JSON error bodies.
#[derive(Debug, Error)]
pub enum PodgateError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred during container operations.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// An error occurred in the HTTP listener.
    #[error(transparent)]
    Server(#[from] ServerError),
}

impl PodgateError {
    /// Return the message relayed to HTTP clients for this error.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Container(error) => error.detail(),
            Self::Config(_) | Self::Server(_) => self.to_string(),
        }
    }
}

/// A specialised `Result` type for podgate operations.
pub type Result<T> = std::result::Result<T, PodgateError>;
