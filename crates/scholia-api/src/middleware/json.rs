use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json` body whose rejections use the API's `{message, error}` shape with
/// status 400, whatever axum would have answered (415, 422, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(invalid_body(rejection)),
        }
    }
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!(status = %rejection.status(), "Rejected request body");
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: Option<String>,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<ApiJson<Payload>, ApiError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        ApiJson::<Payload>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_accepts_json_body() {
        let ApiJson(body) = extract(Some("application/json"), r#"{"name":"x"}"#)
            .await
            .unwrap();
        assert_eq!(body.name.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_wrong_types_and_syntax_are_bad_request() {
        let wrong_type = extract(Some("application/json"), r#"{"name":5}"#).await;
        assert!(matches!(wrong_type, Err(ApiError::BadRequest(_))));

        let broken = extract(Some("application/json"), "{").await;
        assert!(matches!(broken, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let err = extract(None, r#"{"name":"x"}"#).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.starts_with("Invalid request body")));
    }
}
