use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::{FieldError, PipelineError},
    runtime::handle::RuntimeError,
};

/// Transport rendering of a failed call.
#[derive(Debug)]
pub struct ApiError(pub RuntimeError);

impl From<RuntimeError> for ApiError {
    fn from(value: RuntimeError) -> Self {
        Self(value)
    }
}

impl From<PipelineError> for ApiError {
    fn from(value: PipelineError) -> Self {
        Self(RuntimeError::Pipeline(value))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    fields: &'a [FieldError],
}

/// Status code for a pipeline failure kind.
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::DuplicateKey { .. } => StatusCode::BAD_REQUEST,
        PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::EmptyUpdate => StatusCode::BAD_REQUEST,
        PipelineError::InvalidPagination { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::InvalidDateFormat { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
        PipelineError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, fields): (_, _, &[FieldError]) = match &self.0 {
            RuntimeError::Pipeline(err) => (status_for(err), err.kind(), err.fields()),
            RuntimeError::ChannelClosed => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", &[])
            }
            RuntimeError::UnexpectedOutcome(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", &[])
            }
        };

        let body = ErrorBody {
            error: kind,
            message: self.0.to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}
