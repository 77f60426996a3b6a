//! Gateway operations for podgate.
//!
//! This module provides the library-level operations behind each gateway
//! route: [`list_containers`], [`pull_image`], and [`run_container`]. They
//! accept any client implementing the relevant engine traits and return
//! [`crate::error::Result`]. They know nothing about HTTP; the `server`
//! module owns status codes and JSON bodies.

use bollard::models::ContainerSummary;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{
    ContainerCreator, ContainerLister, ContainerStarter, CreateContainerRequest, EngineConnector,
    ImagePuller,
};
use crate::error::Result as PodgateResult;

/// The fixed command every container started by `/run` executes.
pub const RUN_COMMAND: [&str; 2] = ["sleep", "60"];

/// Body of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PullRequest {
    /// Image reference to pull, e.g. `alpine:latest`.
    pub image: String,
}

/// Body of a run request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunRequest {
    /// Image reference to create the container from.
    pub image: String,
}

/// List every container the engine knows about, including stopped ones.
///
/// # Errors
///
/// Returns `ContainerError::ListFailed` when the engine call fails.
pub async fn list_containers<C: ContainerLister + ?Sized>(
    client: &C,
) -> PodgateResult<Vec<ContainerSummary>> {
    EngineConnector::list_containers_async(client).await
}

/// Pull the requested image and wait until the engine has finished.
///
/// # Errors
///
/// Returns `ContainerError::PullFailed` when the pull is rejected or fails
/// part-way.
pub async fn pull_image<P: ImagePuller + ?Sized>(
    client: &P,
    request: &PullRequest,
) -> PodgateResult<()> {
    EngineConnector::pull_image_async(client, &request.image).await?;
    info!(image = %request.image, "image pulled");
    Ok(())
}

/// Create a container running [`RUN_COMMAND`] from the requested image and
/// start it, returning the container ID.
///
/// Start is attempted only after a successful create. A container whose
/// start fails is left in place.
///
/// # Errors
///
/// Returns `ContainerError::CreateFailed` or `ContainerError::StartFailed`.
pub async fn run_container<C>(client: &C, request: &RunRequest) -> PodgateResult<String>
where
    C: ContainerCreator + ContainerStarter + ?Sized,
{
    let create = CreateContainerRequest::new(request.image.as_str())
        .with_cmd(Some(RUN_COMMAND.iter().copied().map(String::from).collect()));
    let container_id = EngineConnector::create_container_async(client, &create).await?;
    info!(%container_id, image = %request.image, "container created");

    if let Err(error) = EngineConnector::start_container_async(client, &container_id).await {
        warn!(%container_id, "container was created but did not start; it has not been removed");
        return Err(error);
    }

    info!(%container_id, "container started");
    Ok(container_id)
}
