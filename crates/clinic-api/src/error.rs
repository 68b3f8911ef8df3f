use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clinic_core::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorBody {
    /// Every failed field rule
    Validation { errors: Vec<String> },
    Message { message: String },
}

/// Failures a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Missing or invalid API key")]
    Unauthorized,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Every domain error is the caller's problem.
            ApiError::Service(_) => StatusCode::BAD_REQUEST,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Service(ServiceError::Validation(errors)) => ErrorBody::Validation {
                errors: errors.clone(),
            },
            ApiError::Service(ServiceError::NotFound(message))
            | ApiError::Service(ServiceError::Storage(message)) => ErrorBody::Message {
                message: message.clone(),
            },
            other => ErrorBody::Message {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Task(e) = &self {
            tracing::error!(error = %e, "request task failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
