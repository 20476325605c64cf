use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use scholia_persist::RevisionNotes;

use crate::{
    error::{ApiError, ApiResult},
    handlers::{input::required_id, study::topic_material},
    middleware::{auth::UserId, json::ApiJson},
    routes::flashcards::TopicRequest,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionNotesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub revision_notes: RevisionNotes,
}

/// Generate notes for the topic, replacing any previous ones
pub async fn create_revision_notes(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ApiJson(req): ApiJson<TopicRequest>,
) -> ApiResult<(StatusCode, Json<RevisionNotesResponse>)> {
    let topic_id = required_id("topicId", req.topic_id)?;
    let material = topic_material(state.persist.as_ref(), &topic_id, &user_id).await?;

    let content = state.tutor.revision_notes(material).await?;
    let notes = state
        .persist
        .upsert_revision_notes(RevisionNotes::new(topic_id, user_id, content))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RevisionNotesResponse {
            message: Some("Revision notes created successfully".to_string()),
            revision_notes: notes,
        }),
    ))
}

pub async fn get_revision_notes(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<TopicRequest>,
) -> ApiResult<Json<RevisionNotesResponse>> {
    let topic_id = required_id("topicId", query.topic_id)?;
    let notes = state
        .persist
        .get_revision_notes(&topic_id, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No revision notes found for this topic".to_string()))?;

    Ok(Json(RevisionNotesResponse {
        message: None,
        revision_notes: notes,
    }))
}
