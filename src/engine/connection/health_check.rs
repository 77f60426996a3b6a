//! Health check and connect-and-verify functionality.
//!
//! `podgate check` uses these helpers to confirm that the configured engine
//! is operational, not just that its socket exists.

use std::time::Duration;

use bollard::Docker;
use tracing::debug;

use super::{EngineConnector, HEALTH_CHECK_TIMEOUT_SECS};
use crate::error::{ContainerError, PodgateError};

impl EngineConnector {
    /// Perform a ping with timeout.
    pub(super) async fn ping_with_timeout(
        docker: &Docker,
        timeout: Duration,
    ) -> Result<(), PodgateError> {
        tokio::time::timeout(timeout, docker.ping())
            .await
            .map_err(|_| {
                PodgateError::from(ContainerError::HealthCheckTimeout {
                    seconds: timeout.as_secs(),
                })
            })?
            .map_err(|e| {
                PodgateError::from(ContainerError::HealthCheckFailed {
                    message: e.to_string(),
                })
            })?;
        Ok(())
    }

    /// Verify the container engine is responsive (async version).
    ///
    /// Sends a ping request to the engine and waits up to ten seconds for a
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::HealthCheckFailed` if the engine does not
    /// respond correctly.
    ///
    /// Returns `ContainerError::HealthCheckTimeout` if the check times out.
    pub async fn health_check_async(docker: &Docker) -> Result<(), PodgateError> {
        Self::ping_with_timeout(docker, Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS)).await
    }

    /// Open a client from the connector's settings and verify the engine
    /// responds (async version).
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::open_async`], then
    /// `ContainerError::HealthCheckFailed` or
    /// `ContainerError::HealthCheckTimeout` if the ping fails.
    pub async fn connect_and_verify_async(&self) -> Result<Docker, PodgateError> {
        let docker = self.open_async().await?;
        Self::health_check_async(&docker).await?;
        debug!(endpoint = %self.settings().endpoint(), "container engine responded to ping");
        Ok(docker)
    }
}
