use scholia_persist::{Chat, PersistenceClient};
use scholia_tutor::ArtifactRequest;

use crate::error::{ApiError, ApiResult};

/// Generation input built from every root thread of a topic, newest first.
///
/// Branches are excluded. NotFound when the user has no root thread there.
pub async fn topic_material(
    persist: &dyn PersistenceClient,
    topic_id: &str,
    user_id: &str,
) -> ApiResult<ArtifactRequest> {
    let roots = persist.list_root_chats(topic_id, user_id).await?;
    if roots.is_empty() {
        return Err(ApiError::NotFound(
            "No chat history found for this topic and user.".to_string(),
        ));
    }

    Ok(flatten(topic_id, user_id, roots))
}

fn flatten(topic_id: &str, user_id: &str, roots: Vec<Chat>) -> ArtifactRequest {
    let mut messages = Vec::new();
    let mut summary = Vec::new();
    for chat in roots {
        messages.extend(chat.messages);
        summary.extend(chat.summary);
    }

    ArtifactRequest {
        topic_id: topic_id.to_string(),
        user_id: user_id.to_string(),
        messages,
        summary,
    }
}
