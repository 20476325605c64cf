use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use scholia_persist::FlashcardDeck;

use crate::{
    error::{ApiError, ApiResult},
    handlers::{input::required_id, study::topic_material},
    middleware::{auth::UserId, json::ApiJson},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRequest {
    pub topic_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlashcardsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub flashcards: FlashcardDeck,
}

/// Generate a new deck from the topic's root threads
pub async fn create_flashcards(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ApiJson(req): ApiJson<TopicRequest>,
) -> ApiResult<(StatusCode, Json<FlashcardsResponse>)> {
    let topic_id = required_id("topicId", req.topic_id)?;
    let material = topic_material(state.persist.as_ref(), &topic_id, &user_id).await?;

    let set = state.tutor.flashcards(material).await?;
    let deck = FlashcardDeck::new(topic_id, user_id, set);
    state.persist.insert_flashcards(&deck).await?;

    tracing::info!(deck_id = %deck.id, cards = deck.flashcards.len(), "Flashcards generated");

    Ok((
        StatusCode::CREATED,
        Json(FlashcardsResponse {
            message: Some("Flashcards created successfully".to_string()),
            flashcards: deck,
        }),
    ))
}

/// Most recently generated deck
pub async fn get_flashcards(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<TopicRequest>,
) -> ApiResult<Json<FlashcardsResponse>> {
    let topic_id = required_id("topicId", query.topic_id)?;
    let deck = state
        .persist
        .latest_flashcards(&topic_id, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No flashcards found for this topic".to_string()))?;

    Ok(Json(FlashcardsResponse {
        message: None,
        flashcards: deck,
    }))
}
