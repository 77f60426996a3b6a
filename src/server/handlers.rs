//! Route handlers.
//!
//! Each engine-backed handler decodes its body first, then opens one engine
//! client, runs a single gateway operation, and drops the client before the
//! response is written.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use bollard::models::ContainerSummary;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::GatewayState;
use super::response::{ApiError, MessageBody, RunBody, StatusBody};
use crate::api::{self, PullRequest, RunRequest};

/// Decode a JSON body regardless of the declared content type.
///
/// `image` is required: `{}` is rejected with 400 rather than forwarded to
/// the engine as an empty reference, unlike a binder that zero-fills
/// missing fields.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|error| {
        debug!(%error, "rejecting malformed request body");
        ApiError::InvalidRequest
    })
}

pub(super) async fn ping() -> Json<MessageBody> {
    Json(MessageBody { message: "pong" })
}

pub(super) async fn redirect_to_ui() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/ui/")])
}

pub(super) async fn list_containers(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<ContainerSummary>>, ApiError> {
    let client = state.connector().open().await?;
    let containers = api::list_containers(&*client).await?;
    Ok(Json(containers))
}

pub(super) async fn pull_image(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<StatusBody>, ApiError> {
    let request: PullRequest = parse_body(&body)?;
    let client = state.connector().open().await?;
    api::pull_image(&*client, &request).await?;
    Ok(Json(StatusBody {
        status: "Image pulled",
    }))
}

pub(super) async fn run_container(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<RunBody>, ApiError> {
    let request: RunRequest = parse_body(&body)?;
    let client = state.connector().open().await?;
    let id = api::run_container(&*client, &request).await?;
    Ok(Json(RunBody {
        status: "Container started",
        id,
    }))
}
