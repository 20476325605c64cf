use scholia_persist::PersistenceClient;

use crate::error::{ApiError, ApiResult};

/// Delete everything generated under a topic, then the topic itself.
///
/// The topic is removed last: if any part of the cascade fails it is still
/// there and the delete can be repeated.
pub async fn delete_topic_tree(
    persist: &dyn PersistenceClient,
    topic_id: &str,
    user_id: &str,
) -> ApiResult<()> {
    let (resources, chats, decks, notes) = tokio::try_join!(
        persist.delete_topic_resources(topic_id),
        persist.delete_topic_chats(topic_id),
        persist.delete_topic_flashcards(topic_id),
        persist.delete_topic_revision_notes(topic_id),
    )?;

    if !persist.delete_topic(topic_id, user_id).await? {
        return Err(ApiError::NotFound("Topic not found".to_string()));
    }

    tracing::info!(
        topic_id = %topic_id,
        resources,
        chats,
        decks,
        notes,
        "Topic deleted"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholia_persist::{new_id, Chat, ChatScope, MemoryPersistenceClient, NewTopic};

    async fn seeded(store: &MemoryPersistenceClient) -> (String, Chat) {
        let topic = store
            .create_topic(NewTopic {
                title: "Graphs".to_string(),
                folder_id: new_id(),
                user_id: "u1".to_string(),
                cover_path: None,
            })
            .await
            .unwrap();
        let chat = Chat::new_root(ChatScope {
            topic_id: topic.id.clone(),
            resource_id: new_id(),
            user_id: "u1".to_string(),
        })
        .into_chat();
        store.insert_chat(&chat).await.unwrap();
        (topic.id, chat)
    }

    #[tokio::test]
    async fn test_failed_cascade_keeps_topic() {
        let store = MemoryPersistenceClient::new();
        let (topic_id, chat) = seeded(&store).await;

        store.fail_chat_deletes(true);
        let result = delete_topic_tree(&store, &topic_id, "u1").await;
        assert!(matches!(result, Err(ApiError::Persist(_))));
        assert!(store.get_topic(&topic_id).await.unwrap().is_some());
        assert!(store.get_chat(&chat.id).await.unwrap().is_some());

        store.fail_chat_deletes(false);
        delete_topic_tree(&store, &topic_id, "u1").await.unwrap();
        assert!(store.get_topic(&topic_id).await.unwrap().is_none());
        assert!(store.get_chat(&chat.id).await.unwrap().is_none());
    }
}
