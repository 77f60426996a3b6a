//! Engine client abstractions.
//!
//! Each engine call the gateway makes is expressed as a small trait so that
//! request handling can be exercised without a running daemon. `Bollard`'s
//! [`Docker`] client implements every trait; tests substitute `mockall`
//! doubles.

use std::future::Future;
use std::pin::{Pin, pin};

use bollard::Docker;
use bollard::models::{
    ContainerCreateBody, ContainerCreateResponse, ContainerSummary, CreateImageInfo,
};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ListContainersOptions, StartContainerOptions,
};
use futures_util::{Stream, StreamExt};
use tracing::debug;

use crate::error::PodgateError;

/// Boxed future type returned by [`ContainerLister`] implementors.
pub type ListContainersFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ContainerSummary>, bollard::errors::Error>> + Send + 'a>>;

/// Boxed future type returned by [`ImagePuller`] implementors.
pub type PullImageFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), bollard::errors::Error>> + Send + 'a>>;

/// Boxed future type returned by [`ContainerCreator`] implementors.
pub type CreateContainerFuture<'a> = Pin<
    Box<dyn Future<Output = Result<ContainerCreateResponse, bollard::errors::Error>> + Send + 'a>,
>;

/// Boxed future type returned by [`ContainerStarter`] implementors.
pub type StartContainerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), bollard::errors::Error>> + Send + 'a>>;

/// Boxed future type returned by [`ConnectEngine`] implementors.
pub type OpenClientFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Box<dyn EngineClient>, PodgateError>> + Send + 'a>>;

/// Behaviour required to list containers.
pub trait ContainerLister {
    /// List containers matching `options`.
    fn list_containers(&self, options: Option<ListContainersOptions>) -> ListContainersFuture<'_>;
}

impl ContainerLister for Docker {
    fn list_containers(&self, options: Option<ListContainersOptions>) -> ListContainersFuture<'_> {
        Box::pin(async move { Self::list_containers(self, options).await })
    }
}

/// Behaviour required to pull an image.
///
/// The returned future resolves only once the engine has finished the pull;
/// any progress message carrying an error fails it.
pub trait ImagePuller {
    /// Pull the image described by `options`.
    fn pull_image(&self, options: CreateImageOptions) -> PullImageFuture<'_>;
}

impl ImagePuller for Docker {
    fn pull_image(&self, options: CreateImageOptions) -> PullImageFuture<'_> {
        Box::pin(drain_pull_progress(Self::create_image(
            self,
            Some(options),
            None,
            None,
        )))
    }
}

/// Consume pull progress until the engine closes the stream.
///
/// The first error item fails the pull.
async fn drain_pull_progress<S>(progress: S) -> Result<(), bollard::errors::Error>
where
    S: Stream<Item = Result<CreateImageInfo, bollard::errors::Error>>,
{
    let mut progress = pin!(progress);
    while let Some(item) = progress.next().await {
        let info = item?;
        if let Some(status) = info.status {
            debug!(%status, layer = ?info.id, "image pull progress");
        }
    }
    Ok(())
}

/// Behaviour required to create a container.
pub trait ContainerCreator {
    /// Create a container from `Bollard` options and body payload.
    fn create_container(
        &self,
        options: Option<CreateContainerOptions>,
        config: ContainerCreateBody,
    ) -> CreateContainerFuture<'_>;
}

impl ContainerCreator for Docker {
    fn create_container(
        &self,
        options: Option<CreateContainerOptions>,
        config: ContainerCreateBody,
    ) -> CreateContainerFuture<'_> {
        Box::pin(async move { Self::create_container(self, options, config).await })
    }
}

/// Behaviour required to start a created container.
pub trait ContainerStarter {
    /// Start the container identified by `container_id`.
    fn start_container(
        &self,
        container_id: &str,
        options: Option<StartContainerOptions>,
    ) -> StartContainerFuture<'_>;
}

impl ContainerStarter for Docker {
    fn start_container(
        &self,
        container_id: &str,
        options: Option<StartContainerOptions>,
    ) -> StartContainerFuture<'_> {
        let id = container_id.to_owned();
        Box::pin(async move { Self::start_container(self, &id, options).await })
    }
}

/// Every engine capability the gateway uses, as one object-safe bundle.
pub trait EngineClient:
    ContainerLister + ImagePuller + ContainerCreator + ContainerStarter + Send + Sync
{
}

impl<T> EngineClient for T where
    T: ContainerLister + ImagePuller + ContainerCreator + ContainerStarter + Send + Sync
{
}

/// Opens a fresh engine client for the duration of one operation.
///
/// The client is released when the returned box is dropped, whether the
/// operation succeeded or not.
pub trait ConnectEngine: Send + Sync {
    /// Open a client.
    fn open(&self) -> OpenClientFuture<'_>;
}
