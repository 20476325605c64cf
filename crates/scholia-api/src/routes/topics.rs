use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use scholia_persist::{NewTopic, Resource, Topic};

use crate::{
    error::{ApiError, ApiResult},
    handlers::{
        cascade::delete_topic_tree,
        input::{required_id, required_text},
    },
    middleware::{auth::UserId, json::ApiJson},
    routes::folders::owned_folder,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: Option<String>,
    pub folder_id: Option<String>,
    pub cover_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTopicsQuery {
    pub folder_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopicResponse {
    pub topic: Topic,
}

#[derive(Debug, Serialize)]
pub struct ListTopicsResponse {
    pub length: usize,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Serialize)]
pub struct TopicDetailResponse {
    pub topic: Topic,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Topic owned by `user_id`, or NotFound
async fn owned_topic(state: &AppState, topic_id: &str, user_id: &str) -> ApiResult<Topic> {
    state
        .persist
        .get_topic(topic_id)
        .await?
        .filter(|topic| topic.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound("Topic not found".to_string()))
}

pub async fn create_topic(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ApiJson(req): ApiJson<CreateTopicRequest>,
) -> ApiResult<(StatusCode, Json<TopicResponse>)> {
    let title = required_text("title", req.title)?.trim().to_string();
    let folder_id = required_id("folderId", req.folder_id)?;
    owned_folder(&state, &folder_id, &user_id).await?;

    if state
        .persist
        .find_topic_by_title(&title, &folder_id, &user_id)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Topic already exists".to_string()));
    }

    let topic = state
        .persist
        .create_topic(NewTopic {
            title,
            folder_id,
            user_id,
            cover_path: req.cover_path.filter(|p| !p.trim().is_empty()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TopicResponse { topic })))
}

pub async fn list_topics(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<ListTopicsQuery>,
) -> ApiResult<Json<ListTopicsResponse>> {
    let folder_id = required_id("folderId", query.folder_id)?;
    let topics = state.persist.list_topics(&folder_id, &user_id).await?;

    Ok(Json(ListTopicsResponse {
        length: topics.len(),
        topics,
    }))
}

/// Topic with all of its resources
pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(topic_id): Path<String>,
) -> ApiResult<Json<TopicDetailResponse>> {
    let topic_id = required_id("topicId", Some(topic_id))?;
    let topic = owned_topic(&state, &topic_id, &user_id).await?;
    let resources = state.persist.list_topic_resources(&topic_id).await?;

    Ok(Json(TopicDetailResponse { topic, resources }))
}

/// Delete a topic and everything generated under it
pub async fn delete_topic(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(topic_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let topic_id = required_id("topicId", Some(topic_id))?;
    owned_topic(&state, &topic_id, &user_id).await?;
    delete_topic_tree(state.persist.as_ref(), &topic_id, &user_id).await?;

    Ok(Json(DeleteResponse {
        message: "Topic and all related content deleted successfully".to_string(),
    }))
}
