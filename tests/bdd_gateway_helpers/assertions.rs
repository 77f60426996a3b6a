//! Then-step assertions for gateway behavioural scenarios.

use rstest_bdd_macros::then;

use super::state::{GatewayTestState, ObservedResponse, StepResult};

fn response(gateway_state: &GatewayTestState) -> StepResult<ObservedResponse> {
    gateway_state
        .response
        .get()
        .ok_or_else(|| String::from("a request should have been sent"))
}

fn engine_calls(gateway_state: &GatewayTestState) -> Vec<String> {
    gateway_state.engine_calls.get().unwrap_or_default()
}

#[then("the response status is {status}")]
fn response_status_is(gateway_state: &GatewayTestState, status: u16) -> StepResult<()> {
    let observed = response(gateway_state)?;
    if observed.status == status {
        return Ok(());
    }
    Err(format!(
        "expected status {status}, got {} with body {}",
        observed.status,
        observed.text()
    ))
}

#[then("the response field {field} is {value}")]
fn response_field_is(
    gateway_state: &GatewayTestState,
    field: String,
    value: String,
) -> StepResult<()> {
    let body = response(gateway_state)?.json()?;
    match body.get(&field).and_then(serde_json::Value::as_str) {
        Some(actual) if actual == value => Ok(()),
        other => Err(format!("expected {field} to be {value}, got {other:?} in {body}")),
    }
}

#[then("the response redirects to {location}")]
fn response_redirects_to(gateway_state: &GatewayTestState, location: String) -> StepResult<()> {
    let observed = response(gateway_state)?;
    if observed.location.as_deref() == Some(location.as_str()) {
        return Ok(());
    }
    Err(format!(
        "expected Location {location}, got {:?}",
        observed.location
    ))
}

#[then("the response lists {count} containers")]
fn response_lists_containers(gateway_state: &GatewayTestState, count: usize) -> StepResult<()> {
    let body = response(gateway_state)?.json()?;
    let listed = body
        .as_array()
        .ok_or_else(|| format!("expected a JSON array, got {body}"))?;
    if listed.len() == count {
        return Ok(());
    }
    Err(format!("expected {count} containers, got {}", listed.len()))
}

#[then("the response body contains {text}")]
fn response_body_contains(gateway_state: &GatewayTestState, text: String) -> StepResult<()> {
    let observed = response(gateway_state)?.text();
    if observed.contains(&text) {
        return Ok(());
    }
    Err(format!("expected body to contain {text}, got {observed}"))
}

#[then("the engine calls were {calls}")]
fn engine_calls_were(gateway_state: &GatewayTestState, calls: String) -> StepResult<()> {
    let expected: Vec<String> = calls.split(';').map(|call| call.trim().to_owned()).collect();
    let actual = engine_calls(gateway_state);
    if actual == expected {
        return Ok(());
    }
    Err(format!("expected engine calls {expected:?}, got {actual:?}"))
}

#[then("the engine was never contacted")]
fn engine_never_contacted(gateway_state: &GatewayTestState) -> StepResult<()> {
    let actual = engine_calls(gateway_state);
    if actual.is_empty() {
        return Ok(());
    }
    Err(format!("expected no engine calls, got {actual:?}"))
}
