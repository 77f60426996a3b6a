//! JSON response bodies and the mapping from domain errors to HTTP replies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::error::PodgateError;

/// Message returned for any body that does not decode into the expected shape.
pub(super) const INVALID_REQUEST: &str = "Invalid request";

/// `{"message": ...}`
#[derive(Debug, Serialize)]
pub(super) struct MessageBody {
    pub(super) message: &'static str,
}

/// `{"status": ...}`
#[derive(Debug, Serialize)]
pub(super) struct StatusBody {
    pub(super) status: &'static str,
}

/// `{"status": ..., "id": ...}`
#[derive(Debug, Serialize)]
pub(super) struct RunBody {
    pub(super) status: &'static str,
    pub(super) id: String,
}

/// `{"error": ...}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Failures a handler can answer with.
#[derive(Debug)]
pub(super) enum ApiError {
    /// The request body was not valid JSON of the expected shape.
    InvalidRequest,
    /// Connecting to or calling the engine failed.
    Engine(PodgateError),
}

impl From<PodgateError> for ApiError {
    fn from(error: PodgateError) -> Self {
        Self::Engine(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: String::from(INVALID_REQUEST),
                }),
            )
                .into_response(),
            Self::Engine(err) => {
                error!(error = %err, "engine operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: err.detail(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
