use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::PipelineError;

/// Success envelope shared by the generation endpoints.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                data,
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

/// Oversized input is the caller's fault and fixable; empty input is a bad
/// request; anything else is on us or the backend.
pub fn pipeline_error_response(error: &PipelineError) -> Response {
    let status = match error {
        PipelineError::InputTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        PipelineError::EmptyDocument => StatusCode::BAD_REQUEST,
        PipelineError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}
