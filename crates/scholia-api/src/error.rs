use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use scholia_persist::PersistError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Timeout(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Tutor service error: {0:#}")]
    Tutor(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Full cause of a 500, attached to the response for
/// [`crate::middleware::errors::expose_error_details`].
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub message: &'static str,
    pub detail: String,
}

const HIDDEN_DETAIL: &str = "Internal Server Error";

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Persist(PersistError::InvalidObjectId(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) | ApiError::Persist(PersistError::ChatNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Persist(_) | ApiError::Tutor(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn internal_message(&self) -> &'static str {
        match self {
            ApiError::Persist(_) => "Storage error",
            ApiError::Tutor(_) => "Tutor service error",
            _ => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if !status.is_server_error() {
            let body = Json(json!({
                "message": self.to_string(),
                "error": status.canonical_reason().unwrap_or_default(),
            }));
            return (status, body).into_response();
        }

        let message = self.internal_message();
        let detail = self.to_string();
        tracing::error!(error = %detail, "{}", message);

        let body = Json(json!({
            "message": message,
            "error": HIDDEN_DETAIL,
        }));
        let mut response = (status, body).into_response();
        response
            .extensions_mut()
            .insert(ErrorDetail { message, detail });
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
