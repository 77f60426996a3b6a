//! Gateway engine operations: list, pull, create, start.
//!
//! These helpers translate gateway requests into `Bollard` calls on any
//! client abstraction and map engine failures into semantic
//! `ContainerError` variants that keep the engine's own message.

use bollard::models::{ContainerCreateBody, ContainerSummary};
use bollard::query_parameters::{CreateImageOptionsBuilder, ListContainersOptionsBuilder};
use tracing::debug;

use super::EngineConnector;
use crate::engine::client::{ContainerCreator, ContainerLister, ContainerStarter, ImagePuller};
use crate::error::{ContainerError, PodgateError};

/// Container-creation request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContainerRequest {
    /// The container image to create from.
    image: String,

    /// Optional command to run in the container.
    cmd: Option<Vec<String>>,
}

impl CreateContainerRequest {
    /// Create a request for `image` with the image's default command.
    ///
    /// The image reference is passed to the engine as given; the engine
    /// decides whether it is valid.
    #[must_use]
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            cmd: None,
        }
    }

    /// Attach an optional command vector.
    #[must_use]
    pub fn with_cmd(mut self, cmd: Option<Vec<String>>) -> Self {
        self.cmd = cmd;
        self
    }

    /// Return the configured image.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Return the optional configured command.
    #[must_use]
    pub fn cmd(&self) -> Option<&[String]> {
        self.cmd.as_deref()
    }
}

impl EngineConnector {
    /// List every container the engine knows about, running or not.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::ListFailed` when the engine call fails.
    pub async fn list_containers_async<C: ContainerLister + ?Sized>(
        lister: &C,
    ) -> Result<Vec<ContainerSummary>, PodgateError> {
        let options = ListContainersOptionsBuilder::new().all(true).build();

        lister.list_containers(Some(options)).await.map_err(|error| {
            PodgateError::from(ContainerError::ListFailed {
                message: error.to_string(),
            })
        })
    }

    /// Pull `image` and wait for the pull to finish.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::PullFailed` when the engine rejects the pull
    /// or reports an error while it is in progress.
    pub async fn pull_image_async<P: ImagePuller + ?Sized>(
        puller: &P,
        image: &str,
    ) -> Result<(), PodgateError> {
        let options = CreateImageOptionsBuilder::new().from_image(image).build();

        puller.pull_image(options).await.map_err(|error| {
            PodgateError::from(ContainerError::PullFailed {
                image: String::from(image),
                message: error.to_string(),
            })
        })?;

        debug!(%image, "image pull completed");
        Ok(())
    }

    /// Create a container and return its engine-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::CreateFailed` when the engine rejects the
    /// create request.
    pub async fn create_container_async<C: ContainerCreator + ?Sized>(
        creator: &C,
        request: &CreateContainerRequest,
    ) -> Result<String, PodgateError> {
        let body = ContainerCreateBody {
            image: Some(String::from(request.image())),
            cmd: request.cmd().map(<[String]>::to_vec),
            ..ContainerCreateBody::default()
        };

        let response = creator.create_container(None, body).await.map_err(|error| {
            PodgateError::from(ContainerError::CreateFailed {
                message: error.to_string(),
            })
        })?;

        debug!(container_id = %response.id, image = %request.image(), "container created");
        Ok(response.id)
    }

    /// Start a previously created container.
    ///
    /// # Errors
    ///
    /// Returns `ContainerError::StartFailed` when the engine refuses to start
    /// the container.
    pub async fn start_container_async<S: ContainerStarter + ?Sized>(
        starter: &S,
        container_id: &str,
    ) -> Result<(), PodgateError> {
        starter
            .start_container(container_id, None)
            .await
            .map_err(|error| {
                PodgateError::from(ContainerError::StartFailed {
                    container_id: String::from(container_id),
                    message: error.to_string(),
                })
            })
    }
}
