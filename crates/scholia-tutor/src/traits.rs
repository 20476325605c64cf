use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use scholia_types::{ChatMessage, ChatMode, FlashcardSet, RevisionNotesContent};

/// Stateless tutor service that produces chat replies and study artifacts.
///
/// Implementations make a single attempt per call; callers decide what a
/// failure means for their own state.
#[async_trait]
pub trait TutorClient: Send + Sync {
    /// Answer one user query given the thread context
    async fn respond(&self, request: RespondRequest) -> Result<RespondReply>;

    /// Generate a flashcard set from a topic's conversations
    async fn flashcards(&self, request: ArtifactRequest) -> Result<FlashcardSet>;

    /// Generate revision notes from a topic's conversations
    async fn revision_notes(&self, request: ArtifactRequest) -> Result<RevisionNotesContent>;
}

/// Payload of `POST /respond/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondRequest {
    pub user_query: String,
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "topicId")]
    pub topic_id: String,
    pub summary: Vec<String>,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "modeId", skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<ChatMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RespondReply {
    /// Non-blank assistant reply
    pub message: String,
    /// Replacement summary, if the service produced one
    pub summary: Option<Vec<String>>,
}

/// Payload of `POST /cards/` and `POST /notes/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequest {
    pub topic_id: String,
    pub user_id: String,
    pub messages: Vec<ChatMessage>,
    pub summary: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_request_wire_names() {
        let request = RespondRequest {
            user_query: "explain X".to_string(),
            messages: vec![ChatMessage::user("hi")],
            topic_id: "t".to_string(),
            summary: vec![],
            resource_id: "r".to_string(),
            user_id: "u".to_string(),
            mode_id: Some(ChatMode::Grounded),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["user_query"], "explain X");
        assert_eq!(json["topicId"], "t");
        assert_eq!(json["resourceId"], "r");
        assert_eq!(json["userId"], "u");
        assert_eq!(json["modeId"], "5");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_respond_request_omits_missing_mode() {
        let request = RespondRequest {
            user_query: "q".to_string(),
            messages: vec![],
            topic_id: "t".to_string(),
            summary: vec![],
            resource_id: "r".to_string(),
            user_id: "u".to_string(),
            mode_id: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("modeId").is_none());
    }

    #[test]
    fn test_artifact_request_is_camel_case() {
        let request = ArtifactRequest {
            topic_id: "t".to_string(),
            user_id: "u".to_string(),
            messages: vec![],
            summary: vec!["s".to_string()],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topicId"], "t");
        assert_eq!(json["userId"], "u");
        assert_eq!(json["summary"][0], "s");
    }
}
