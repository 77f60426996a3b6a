//! Scripted in-memory engine used by the gateway scenarios.
//!
//! Every call the gateway makes is appended to a shared log so that
//! assertions can check both what was asked of the engine and in which order.

use std::sync::{Arc, Mutex, PoisonError};

use bollard::errors::Error as BollardError;
use bollard::models::{ContainerCreateBody, ContainerCreateResponse, ContainerSummary};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ListContainersOptions, StartContainerOptions,
};
use podgate::engine::{
    ConnectEngine, ContainerCreator, ContainerLister, ContainerStarter, CreateContainerFuture,
    EngineClient, ImagePuller, ListContainersFuture, OpenClientFuture, PullImageFuture,
    StartContainerFuture,
};
use podgate::error::{ContainerError, PodgateError};

/// Identifier the scripted engine assigns to created containers.
pub const CREATED_ID: &str = "bdd-container-id";

/// How the scripted engine behaves for one scenario.
#[derive(Debug, Clone, Default)]
pub struct EngineScript {
    /// Container names reported by the list call.
    pub containers: Vec<String>,
    /// When set, opening a client fails with this message.
    pub unreachable: Option<String>,
    /// When set, pulls fail with this daemon message.
    pub pull_failure: Option<String>,
    /// When set, creates fail with this daemon message.
    pub create_failure: Option<String>,
    /// When set, starts fail with this daemon message.
    pub start_failure: Option<String>,
}

/// Shared, ordered record of engine calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, call: String) {
    log.lock().unwrap_or_else(PoisonError::into_inner).push(call);
}

const fn daemon_error(message: String) -> BollardError {
    BollardError::DockerResponseServerError {
        status_code: 500,
        message,
    }
}

/// Connector that hands out [`ScriptedEngine`] clients.
pub struct ScriptedConnector {
    script: EngineScript,
    log: CallLog,
}

impl ScriptedConnector {
    /// Build a connector for `script` that records into `log`.
    pub const fn new(script: EngineScript, log: CallLog) -> Self {
        Self { script, log }
    }
}

impl ConnectEngine for ScriptedConnector {
    fn open(&self) -> OpenClientFuture<'_> {
        Box::pin(async move {
            record(&self.log, String::from("open"));
            if let Some(message) = self.script.unreachable.clone() {
                return Err(PodgateError::from(ContainerError::ConnectionFailed {
                    message,
                }));
            }
            let client: Box<dyn EngineClient> = Box::new(ScriptedEngine {
                script: self.script.clone(),
                log: Arc::clone(&self.log),
            });
            Ok(client)
        })
    }
}

/// Engine client whose answers come from an [`EngineScript`].
struct ScriptedEngine {
    script: EngineScript,
    log: CallLog,
}

impl ContainerLister for ScriptedEngine {
    fn list_containers(&self, options: Option<ListContainersOptions>) -> ListContainersFuture<'_> {
        Box::pin(async move {
            let all = options.is_some_and(|opts| opts.all);
            record(&self.log, format!("list all={all}"));
            Ok(self
                .script
                .containers
                .iter()
                .map(|name| ContainerSummary {
                    id: Some(format!("{name}-id")),
                    names: Some(vec![format!("/{name}")]),
                    ..ContainerSummary::default()
                })
                .collect())
        })
    }
}

impl ImagePuller for ScriptedEngine {
    fn pull_image(&self, options: CreateImageOptions) -> PullImageFuture<'_> {
        Box::pin(async move {
            let image = options.from_image.unwrap_or_default();
            record(&self.log, format!("pull {image}"));
            self.script.pull_failure.clone().map_or(Ok(()), |message| {
                Err(daemon_error(message))
            })
        })
    }
}

impl ContainerCreator for ScriptedEngine {
    fn create_container(
        &self,
        _options: Option<CreateContainerOptions>,
        config: ContainerCreateBody,
    ) -> CreateContainerFuture<'_> {
        Box::pin(async move {
            let image = config.image.unwrap_or_default();
            let cmd = config.cmd.unwrap_or_default().join(" ");
            record(&self.log, format!("create {image} {cmd}"));
            if let Some(message) = self.script.create_failure.clone() {
                return Err(daemon_error(message));
            }
            Ok(ContainerCreateResponse {
                id: String::from(CREATED_ID),
                warnings: vec![],
            })
        })
    }
}

impl ContainerStarter for ScriptedEngine {
    fn start_container(
        &self,
        container_id: &str,
        _options: Option<StartContainerOptions>,
    ) -> StartContainerFuture<'_> {
        let id = container_id.to_owned();
        Box::pin(async move {
            record(&self.log, format!("start {id}"));
            self.script.start_failure.clone().map_or(Ok(()), |message| {
                Err(daemon_error(message))
            })
        })
    }
}
