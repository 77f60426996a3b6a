//! Given/when step definitions for gateway behavioural scenarios.

use std::sync::{Arc, Mutex, PoisonError};

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, header};
use camino::Utf8PathBuf;
use podgate::server::{GatewayState, router};
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;
use tower::ServiceExt;

use super::engine::{CallLog, EngineScript, ScriptedConnector};
use super::state::{GatewayTestState, ObservedResponse, StepResult};

const UI_INDEX: &str = "<!doctype html><title>podgate</title>";

fn update_script(gateway_state: &GatewayTestState, change: impl FnOnce(&mut EngineScript)) {
    let mut script = gateway_state.script.get().unwrap_or_default();
    change(&mut script);
    gateway_state.script.set(script);
}

#[given("the engine reports containers {names}")]
fn engine_reports_containers(gateway_state: &GatewayTestState, names: String) {
    update_script(gateway_state, |script| {
        script.containers = names.split(',').map(|name| name.trim().to_owned()).collect();
    });
}

#[given("the engine is unreachable with {message}")]
fn engine_is_unreachable(gateway_state: &GatewayTestState, message: String) {
    update_script(gateway_state, |script| script.unreachable = Some(message));
}

#[given("the engine fails to pull with {message}")]
fn engine_fails_to_pull(gateway_state: &GatewayTestState, message: String) {
    update_script(gateway_state, |script| script.pull_failure = Some(message));
}

#[given("the engine fails to create with {message}")]
fn engine_fails_to_create(gateway_state: &GatewayTestState, message: String) {
    update_script(gateway_state, |script| script.create_failure = Some(message));
}

#[given("the engine fails to start with {message}")]
fn engine_fails_to_start(gateway_state: &GatewayTestState, message: String) {
    update_script(gateway_state, |script| script.start_failure = Some(message));
}

#[given("a UI directory containing index.html")]
fn ui_directory_with_index(gateway_state: &GatewayTestState) -> StepResult<()> {
    let dir = TempDir::new().map_err(|e| format!("failed to create temp dir: {e}"))?;
    std::fs::write(dir.path().join("index.html"), UI_INDEX)
        .map_err(|e| format!("failed to write index.html: {e}"))?;
    gateway_state.static_dir.set(Arc::new(dir));
    Ok(())
}

#[when("a client sends GET {path}")]
fn client_sends_get(gateway_state: &GatewayTestState, path: String) -> StepResult<()> {
    send(gateway_state, Method::GET, &path, Body::empty())
}

#[when("a client posts image {image} to {path}")]
fn client_posts_image(
    gateway_state: &GatewayTestState,
    image: String,
    path: String,
) -> StepResult<()> {
    let body = serde_json::json!({ "image": image }).to_string();
    send(gateway_state, Method::POST, &path, Body::from(body))
}

#[when("a client posts a malformed body to {path}")]
fn client_posts_malformed_body(gateway_state: &GatewayTestState, path: String) -> StepResult<()> {
    send(gateway_state, Method::POST, &path, Body::from("{\"image\":"))
}

fn static_dir(gateway_state: &GatewayTestState) -> StepResult<Utf8PathBuf> {
    gateway_state.static_dir.get().map_or_else(
        || Ok(Utf8PathBuf::from("/nonexistent/podgate-ui")),
        |dir| {
            Utf8PathBuf::try_from(dir.path().to_path_buf())
                .map_err(|e| format!("temp dir is not UTF-8: {e}"))
        },
    )
}

fn send(gateway_state: &GatewayTestState, method: Method, path: &str, body: Body) -> StepResult<()> {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let script = gateway_state.script.get().unwrap_or_default();
    let connector = ScriptedConnector::new(script, Arc::clone(&log));
    let app = router(GatewayState::new(Arc::new(connector)), &static_dir(gateway_state)?);

    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .map_err(|e| format!("failed to build request: {e}"))?;

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let observed = runtime.block_on(async {
        let response = app
            .oneshot(request)
            .await
            .map_err(|e| format!("router failed: {e}"))?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;
        Ok::<_, String>(ObservedResponse {
            status,
            location,
            body: bytes.to_vec(),
        })
    })?;

    gateway_state.response.set(observed);
    let calls = log.lock().unwrap_or_else(PoisonError::into_inner).clone();
    gateway_state.engine_calls.set(calls);
    Ok(())
}
