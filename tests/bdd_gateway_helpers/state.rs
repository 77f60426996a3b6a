//! Shared behavioural-test state for gateway scenarios.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;

use super::engine::EngineScript;

/// Step result type for gateway BDD tests.
pub type StepResult<T> = Result<T, String>;

/// What the client observed for the most recent request.
#[derive(Debug, Clone)]
pub struct ObservedResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Location` header, when present.
    pub location: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ObservedResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> StepResult<serde_json::Value> {
        serde_json::from_slice(&self.body)
            .map_err(|e| format!("response body is not JSON ({e}): {}", self.text()))
    }

    /// Body as lossy UTF-8 for messages.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Shared scenario state for gateway behavioural tests.
#[derive(Default, ScenarioState)]
pub struct GatewayTestState {
    /// Scripted engine behaviour for the scenario.
    pub(crate) script: Slot<EngineScript>,

    /// Directory served under `/ui/`.
    pub(crate) static_dir: Slot<Arc<TempDir>>,

    /// Response to the most recent request.
    pub(crate) response: Slot<ObservedResponse>,

    /// Engine calls made while handling the most recent request.
    pub(crate) engine_calls: Slot<Vec<String>>,
}

/// Fixture providing fresh state for each gateway scenario.
#[fixture]
pub fn gateway_state() -> GatewayTestState {
    let state = GatewayTestState::default();
    state.script.set(EngineScript::default());
    state.engine_calls.set(Vec::new());
    state
}
