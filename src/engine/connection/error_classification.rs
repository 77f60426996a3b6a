//! Mapping from `Bollard` connection failures to semantic errors.
//!
//! Connection and negotiation failures are inspected for an underlying I/O
//! cause so that a missing socket or a permissions problem surfaces as such
//! rather than as an opaque transport error.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::ContainerError;

/// Strip the `unix://` or `npipe://` scheme from a socket URI.
///
/// Returns `None` for HTTP endpoints, which have no filesystem path.
pub(super) fn extract_socket_path(socket_uri: &str) -> Option<&Path> {
    socket_uri
        .strip_prefix("unix://")
        .or_else(|| socket_uri.strip_prefix("npipe://"))
        .map(Path::new)
}

fn classify_io_error_kind(
    kind: ErrorKind,
    socket_path: Option<&Path>,
    error_msg: &str,
) -> ContainerError {
    match (kind, socket_path) {
        (ErrorKind::PermissionDenied, Some(path)) => ContainerError::PermissionDenied {
            path: path.to_path_buf(),
            message: error_msg.to_owned(),
        },
        (ErrorKind::NotFound, Some(path)) => ContainerError::SocketNotFound {
            path: path.to_path_buf(),
            message: error_msg.to_owned(),
        },
        _ => ContainerError::ConnectionFailed {
            message: error_msg.to_owned(),
        },
    }
}

/// Find the I/O error kind behind a `Bollard` error, if there is one.
fn io_cause(bollard_error: &bollard::errors::Error) -> Option<ErrorKind> {
    if let bollard::errors::Error::IOError { err } = bollard_error {
        return Some(io_error_kind_in_chain(err).unwrap_or_else(|| err.kind()));
    }
    io_error_kind_in_chain(bollard_error)
}

/// Classify a failure to configure a client for `socket_uri`.
///
/// Falls back to `ConnectionFailed` when no more specific variant applies.
pub(super) fn classify_connection_error(
    bollard_error: &bollard::errors::Error,
    socket_uri: &str,
) -> ContainerError {
    let socket_path = extract_socket_path(socket_uri);
    let error_msg = bollard_error.to_string();

    if let (bollard::errors::Error::SocketNotFoundError(_), Some(path)) =
        (bollard_error, socket_path)
    {
        return ContainerError::SocketNotFound {
            path: path.to_path_buf(),
            message: error_msg,
        };
    }

    io_cause(bollard_error).map_or_else(
        || ContainerError::ConnectionFailed {
            message: error_msg.clone(),
        },
        |kind| classify_io_error_kind(kind, socket_path, &error_msg),
    )
}

/// Classify a failed API version negotiation.
///
/// Negotiation is the first request on a fresh client, so transport failures
/// are reported as connection problems. Anything the engine itself answered
/// becomes `VersionNegotiationFailed`.
pub(super) fn classify_negotiation_error(
    bollard_error: &bollard::errors::Error,
    socket_uri: &str,
) -> ContainerError {
    match io_cause(bollard_error) {
        Some(_) => classify_connection_error(bollard_error, socket_uri),
        None if matches!(
            bollard_error,
            bollard::errors::Error::RequestTimeoutError
                | bollard::errors::Error::HyperResponseError { .. }
        ) =>
        {
            ContainerError::ConnectionFailed {
                message: bollard_error.to_string(),
            }
        }
        None => ContainerError::VersionNegotiationFailed {
            message: bollard_error.to_string(),
        },
    }
}

/// Walk the error source chain looking for an `io::Error` kind.
fn io_error_kind_in_chain(error: &dyn std::error::Error) -> Option<ErrorKind> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = error.source();
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return Some(io_err.kind());
        }
        current = err.source();
    }
    None
}
