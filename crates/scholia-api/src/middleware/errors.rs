use axum::{
    extract::{Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    error::{ApiError, ErrorDetail},
    state::AppState,
};

/// Replace the generic `error` text of 500 responses with the full cause
/// when `server.expose_error_details` is on.
pub async fn expose_error_details(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if !state.config.server.expose_error_details {
        return response;
    }

    match response.extensions().get::<ErrorDetail>().cloned() {
        Some(ErrorDetail { message, detail }) => {
            let body = Json(json!({
                "message": message,
                "error": detail,
            }));
            (response.status(), body).into_response()
        }
        None => response,
    }
}

/// Give the bare 408 produced by the timeout layer the usual error body
pub async fn timeout_body(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(CONTENT_TYPE)
    {
        tracing::warn!("Request timed out");
        return ApiError::Timeout("Request timed out".to_string()).into_response();
    }
    response
}
