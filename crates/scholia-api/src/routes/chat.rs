use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use scholia_persist::{Chat, ChatScope};

use crate::{
    error::ApiResult,
    handlers::{
        input::{optional_id, parse_mode, required_id, required_text},
        turn::{run_turn, TurnInput},
    },
    middleware::{auth::UserId, json::ApiJson},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub query: Option<String>,
    pub topic_id: Option<String>,
    pub resource_id: Option<String>,
    pub chat_id: Option<String>,
    pub parent_id: Option<String>,
    #[serde(alias = "mode")]
    pub mode_id: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub chat: Chat,
    pub reference_chats: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub chats: Vec<Chat>,
}

impl ChatRequest {
    fn into_input(self, user_id: String) -> ApiResult<TurnInput> {
        Ok(TurnInput {
            query: required_text("query", self.query)?,
            scope: ChatScope {
                topic_id: required_id("topicId", self.topic_id)?,
                resource_id: required_id("resourceId", self.resource_id)?,
                user_id,
            },
            chat_id: optional_id("chatId", self.chat_id)?,
            parent_id: optional_id("parentId", self.parent_id)?,
            mode_id: parse_mode(self.mode_id)?,
        })
    }
}

/// Send a message: start a thread, branch from a root, or continue a thread
pub async fn send_chat(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ApiJson(req): ApiJson<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let input = req.into_input(user_id)?;

    let (chat, reference_chats) = run_turn(state.persist.as_ref(), state.tutor.as_ref(), input).await?;

    Ok(Json(ChatResponse {
        message: "Chat processed successfully".to_string(),
        chat,
        reference_chats,
    }))
}

/// Every thread of a resource, roots and branches, oldest first
pub async fn list_resource_chats(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Path(resource_id): Path<String>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    let resource_id = required_id("resourceId", Some(resource_id))?;
    let chats = state
        .persist
        .list_resource_chats(&resource_id, &user_id)
        .await?;

    Ok(Json(ChatHistoryResponse { chats }))
}
