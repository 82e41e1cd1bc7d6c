use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use skyline_core::error::CoreError;
use skyline_dispatch::error::DispatchError;
use skyline_export::error::RenderError;

/// The only failure text a client ever sees for a failed submission.
pub const FAILURE_MESSAGE: &str = "Error submitting form. Please try again.";

const TOO_LARGE_MESSAGE: &str = "Uploaded file is too large.";
const BAD_REQUEST_MESSAGE: &str = "The form submission could not be read.";

/// JSON body of every submission response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

/// A submission that got past request parsing but could not be completed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("certification failed: {0}")]
    Certification(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Unified API error type for all route handlers.
///
/// Details are logged server-side only; responses carry a fixed message.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(detail) => {
                tracing::warn!(detail = %detail, "rejected malformed submission");
                (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE)
            }
            ApiError::PayloadTooLarge(detail) => {
                tracing::warn!(detail = %detail, "rejected oversized submission");
                (StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE_MESSAGE)
            }
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE)
            }
        };

        let body = SubmitResponse {
            success: false,
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}
