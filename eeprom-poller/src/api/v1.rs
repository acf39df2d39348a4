//! API version 1 endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::device::DeviceHandle;
use crate::error::Error;
use crate::tracing::prelude::*;

/// Shared application state for API endpoints.
#[derive(Clone)]
pub struct AppState {
    /// Reader session used to serve blocking sample reads.
    device: DeviceHandle,
}

impl AppState {
    /// Create API state around a reader session.
    pub fn new(device: DeviceHandle) -> Self {
        Self { device }
    }
}

/// API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Write acknowledgement payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WriteResponse {
    /// Number of bytes accepted (always the full request body)
    pub written: usize,
}

/// Health check endpoint handler.
///
/// Returns a simple OK status to verify the API is running.
async fn health() -> &'static str {
    "OK"
}

/// Blocking sample read endpoint handler.
///
/// Waits until the sampler has produced a reading, drains it, and
/// returns it as plain text. At most one concurrent request receives
/// any given reading; the rest keep waiting for the next poll.
///
/// # Example
/// ```bash
/// curl http://localhost:7786/api/v1/sample
/// ```
async fn get_sample(State(state): State<AppState>) -> Response {
    match state.device.read_sample().await {
        Ok(sample) => (StatusCode::OK, sample.to_string()).into_response(),
        Err(Error::Interrupted) => {
            let error = ErrorResponse {
                error: "read interrupted by shutdown".to_string(),
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(error)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Sample read failed.");
            let error = ErrorResponse {
                error: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
        }
    }
}

/// Sample write endpoint handler.
///
/// The device has no write path; the body is accepted, discarded, and
/// reported as fully written, matching the read-only nature of the
/// underlying hardware.
async fn post_sample(State(state): State<AppState>, body: Bytes) -> Json<WriteResponse> {
    let written = state.device.write(&body);
    Json(WriteResponse { written })
}

/// Build the v1 API routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sample", get(get_sample).post(post_sample))
        .with_state(state)
}
