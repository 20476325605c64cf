use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use scholia_persist::{Folder, NewFolder, Topic};

use crate::{
    error::{ApiError, ApiResult},
    handlers::{
        cascade::delete_topic_tree,
        input::{required_id, required_text},
    },
    middleware::{auth::UserId, json::ApiJson},
    routes::topics::DeleteResponse,
    state::AppState,
};

pub const MAX_FOLDER_NAME_CHARS: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: Option<String>,
    pub cover_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub folder: Folder,
}

#[derive(Debug, Serialize)]
pub struct ListFoldersResponse {
    pub length: usize,
    pub folders: Vec<Folder>,
}

#[derive(Debug, Serialize)]
pub struct FolderDetailResponse {
    pub folder: Folder,
    pub topics: Vec<Topic>,
}

/// Folder owned by `user_id`, or NotFound
pub(crate) async fn owned_folder(
    state: &AppState,
    folder_id: &str,
    user_id: &str,
) -> ApiResult<Folder> {
    state
        .persist
        .get_folder(folder_id)
        .await?
        .filter(|folder| folder.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound("Folder not found".to_string()))
}

pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ApiJson(req): ApiJson<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<FolderResponse>)> {
    let name = required_text("name", req.name)?.trim().to_string();
    if name.chars().count() > MAX_FOLDER_NAME_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Folder name must be at most {} characters",
            MAX_FOLDER_NAME_CHARS
        )));
    }

    let folder = state
        .persist
        .create_folder(NewFolder {
            name,
            user_id,
            cover_path: req.cover_path.filter(|p| !p.trim().is_empty()),
        })
        .await?;

    tracing::info!(folder_id = %folder.id, "Folder created");
    Ok((StatusCode::CREATED, Json(FolderResponse { folder })))
}

pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
) -> ApiResult<Json<ListFoldersResponse>> {
    let folders = state.persist.list_folders(&user_id).await?;

    Ok(Json(ListFoldersResponse {
        length: folders.len(),
        folders,
    }))
}

/// Folder with its topics
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(folder_id): Path<String>,
) -> ApiResult<Json<FolderDetailResponse>> {
    let folder_id = required_id("folderId", Some(folder_id))?;
    let folder = owned_folder(&state, &folder_id, &user_id).await?;
    let topics = state.persist.list_topics(&folder_id, &user_id).await?;

    Ok(Json(FolderDetailResponse { folder, topics }))
}

/// Delete a folder after cascading through each of its topics
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(folder_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let folder_id = required_id("folderId", Some(folder_id))?;
    owned_folder(&state, &folder_id, &user_id).await?;

    let topics = state.persist.list_topics(&folder_id, &user_id).await?;
    for topic in &topics {
        delete_topic_tree(state.persist.as_ref(), &topic.id, &user_id).await?;
    }
    state.persist.delete_folder(&folder_id, &user_id).await?;

    tracing::info!(folder_id = %folder_id, topics = topics.len(), "Folder deleted");

    Ok(Json(DeleteResponse {
        message: "Folder and all related content deleted successfully".to_string(),
    }))
}
