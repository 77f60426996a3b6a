//! Container engine connection and operations.
//!
//! This module is the gateway's only contact with Docker or Podman. Engine
//! settings are resolved once at start-up into [`EngineSettings`]; the
//! socket endpoint follows a priority-based fallback chain:
//!
//! 1. CLI argument (`--engine-socket`)
//! 2. `PODGATE_ENGINE_SOCKET` environment variable
//! 3. Config file (`engine_socket` in TOML)
//! 4. `DOCKER_HOST` environment variable
//! 5. `CONTAINER_HOST` environment variable
//! 6. `PODMAN_HOST` environment variable
//! 7. Platform default (`/var/run/docker.sock` on Unix)
//!
//! [`EngineConnector`] opens a fresh client per operation through the
//! [`ConnectEngine`] trait; the client is released when it goes out of scope.

mod client;
mod connection;
mod settings;

pub use client::{
    ConnectEngine, ContainerCreator, ContainerLister, ContainerStarter, CreateContainerFuture,
    EngineClient, ImagePuller, ListContainersFuture, OpenClientFuture, PullImageFuture,
    StartContainerFuture,
};
pub use connection::{CreateContainerRequest, EngineConnector, SocketResolver};
pub use settings::{ApiVersion, EngineSettings, TlsMaterial};
