use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use scholia_persist::{Chat, Resource};

use crate::{
    error::{ApiError, ApiResult},
    handlers::input::required_id,
    middleware::auth::UserId,
    routes::topics::DeleteResponse,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub resource: Resource,
    /// First thread opened on this resource, if any
    pub chat: Option<Chat>,
}

async fn owned_resource(state: &AppState, resource_id: &str, user_id: &str) -> ApiResult<Resource> {
    state
        .persist
        .get_resource(resource_id)
        .await?
        .filter(|resource| resource.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))
}

pub async fn get_resource(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(resource_id): Path<String>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource_id = required_id("resourceId", Some(resource_id))?;
    let resource = owned_resource(&state, &resource_id, &user_id).await?;
    let chat = state
        .persist
        .list_resource_chats(&resource_id, &user_id)
        .await?
        .into_iter()
        .next();

    Ok(Json(ResourceResponse { resource, chat }))
}

/// Delete a resource and its chat threads
pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(resource_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let resource_id = required_id("resourceId", Some(resource_id))?;
    owned_resource(&state, &resource_id, &user_id).await?;

    state.persist.delete_resource(&resource_id).await?;
    let chats = state.persist.delete_resource_chats(&resource_id).await?;
    tracing::info!(resource_id = %resource_id, chats, "Resource deleted");

    Ok(Json(DeleteResponse {
        message: "Resource and associated chat deleted successfully".to_string(),
    }))
}
