//! In-process [`PersistenceClient`] backed by vectors behind a lock.
//!
//! Mirrors the MongoDB implementation's ordering and cascade semantics so the
//! API can be exercised without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{
    Chat, ChatTurn, FlashcardDeck, Folder, NewFolder, NewTopic, Resource, RevisionNotes, Topic,
};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Collections {
    chats: Vec<Chat>,
    resources: Vec<Resource>,
    folders: Vec<Folder>,
    topics: Vec<Topic>,
    flashcards: Vec<FlashcardDeck>,
    revision_notes: Vec<RevisionNotes>,
}

#[derive(Default)]
pub struct MemoryPersistenceClient {
    inner: RwLock<Collections>,
    fail_chat_deletes: AtomicBool,
}

impl MemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make bulk chat deletes fail with [`PersistError::Internal`] until reset
    pub fn fail_chat_deletes(&self, fail: bool) {
        self.fail_chat_deletes.store(fail, Ordering::SeqCst);
    }

    fn check_chat_delete(&self) -> Result<()> {
        if self.fail_chat_deletes.load(Ordering::SeqCst) {
            return Err(PersistError::Internal("chat delete failed".to_string()));
        }
        Ok(())
    }
}

fn drain_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> u64 {
    let before = items.len();
    items.retain(|item| !pred(item));
    (before - items.len()) as u64
}

#[async_trait]
impl PersistenceClient for MemoryPersistenceClient {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let inner = self.inner.read().await;
        Ok(inner.chats.iter().find(|c| c.id == chat_id).cloned())
    }

    async fn insert_chat(&self, chat: &Chat) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.chats.iter().any(|c| c.id == chat.id) {
            return Err(PersistError::Internal(format!("duplicate chat id {}", chat.id)));
        }
        inner.chats.push(chat.clone());
        Ok(())
    }

    async fn append_turn(&self, chat_id: &str, turn: &ChatTurn) -> Result<()> {
        let mut inner = self.inner.write().await;
        let chat = inner
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or_else(|| PersistError::ChatNotFound(chat_id.to_string()))?;

        chat.messages.extend(turn.messages.iter().cloned());
        chat.summary = turn.summary.clone();
        if turn.mode_id.is_some() {
            chat.mode_id = turn.mode_id;
        }
        chat.updated_at = turn.updated_at;
        Ok(())
    }

    async fn list_resource_chats(&self, resource_id: &str, user_id: &str) -> Result<Vec<Chat>> {
        let inner = self.inner.read().await;
        let mut chats: Vec<Chat> = inner
            .chats
            .iter()
            .filter(|c| c.resource_id == resource_id && c.user_id == user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(chats)
    }

    async fn list_root_chats(&self, topic_id: &str, user_id: &str) -> Result<Vec<Chat>> {
        let inner = self.inner.read().await;
        // Reverse first so insertion order breaks created_at ties newest-first
        let mut chats: Vec<Chat> = inner
            .chats
            .iter()
            .rev()
            .filter(|c| c.topic_id == topic_id && c.user_id == user_id && !c.is_branch())
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(chats)
    }

    async fn delete_resource_chats(&self, resource_id: &str) -> Result<u64> {
        self.check_chat_delete()?;
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.chats, |c| c.resource_id == resource_id))
    }

    async fn delete_topic_chats(&self, topic_id: &str) -> Result<u64> {
        self.check_chat_delete()?;
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.chats, |c| c.topic_id == topic_id))
    }

    async fn insert_resource(&self, resource: &Resource) -> Result<()> {
        self.inner.write().await.resources.push(resource.clone());
        Ok(())
    }

    async fn get_resource(&self, resource_id: &str) -> Result<Option<Resource>> {
        let inner = self.inner.read().await;
        Ok(inner.resources.iter().find(|r| r.id == resource_id).cloned())
    }

    async fn list_topic_resources(&self, topic_id: &str) -> Result<Vec<Resource>> {
        let inner = self.inner.read().await;
        Ok(inner
            .resources
            .iter()
            .filter(|r| r.topic_id == topic_id)
            .cloned()
            .collect())
    }

    async fn delete_resource(&self, resource_id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.resources, |r| r.id == resource_id) > 0)
    }

    async fn delete_topic_resources(&self, topic_id: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.resources, |r| r.topic_id == topic_id))
    }

    async fn create_folder(&self, folder: NewFolder) -> Result<Folder> {
        let folder = Folder::from(folder);
        self.inner.write().await.folders.push(folder.clone());
        Ok(folder)
    }

    async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>> {
        let inner = self.inner.read().await;
        Ok(inner.folders.iter().find(|f| f.id == folder_id).cloned())
    }

    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>> {
        let inner = self.inner.read().await;
        Ok(inner
            .folders
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_folder(&self, folder_id: &str, user_id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.folders, |f| f.id == folder_id && f.user_id == user_id) > 0)
    }

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic> {
        let topic = Topic::from(topic);
        self.inner.write().await.topics.push(topic.clone());
        Ok(topic)
    }

    async fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>> {
        let inner = self.inner.read().await;
        Ok(inner.topics.iter().find(|t| t.id == topic_id).cloned())
    }

    async fn find_topic_by_title(
        &self,
        title: &str,
        folder_id: &str,
        user_id: &str,
    ) -> Result<Option<Topic>> {
        let inner = self.inner.read().await;
        Ok(inner
            .topics
            .iter()
            .find(|t| t.title == title && t.folder_id == folder_id && t.user_id == user_id)
            .cloned())
    }

    async fn list_topics(&self, folder_id: &str, user_id: &str) -> Result<Vec<Topic>> {
        let inner = self.inner.read().await;
        Ok(inner
            .topics
            .iter()
            .filter(|t| t.folder_id == folder_id && t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_topic(&self, topic_id: &str, user_id: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.topics, |t| t.id == topic_id && t.user_id == user_id) > 0)
    }

    async fn insert_flashcards(&self, deck: &FlashcardDeck) -> Result<()> {
        self.inner.write().await.flashcards.push(deck.clone());
        Ok(())
    }

    async fn latest_flashcards(
        &self,
        topic_id: &str,
        user_id: &str,
    ) -> Result<Option<FlashcardDeck>> {
        let inner = self.inner.read().await;
        Ok(inner
            .flashcards
            .iter()
            .rev()
            .filter(|d| d.topic_id == topic_id && d.user_id == user_id)
            .max_by_key(|d| d.created_at)
            .cloned())
    }

    async fn delete_topic_flashcards(&self, topic_id: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.flashcards, |d| d.topic_id == topic_id))
    }

    async fn upsert_revision_notes(&self, notes: RevisionNotes) -> Result<RevisionNotes> {
        let mut inner = self.inner.write().await;
        let existing = inner
            .revision_notes
            .iter_mut()
            .find(|n| n.topic_id == notes.topic_id && n.user_id == notes.user_id);

        match existing {
            Some(stored) => {
                stored.content = notes.content;
                stored.updated_at = Utc::now();
                Ok(stored.clone())
            }
            None => {
                inner.revision_notes.push(notes.clone());
                Ok(notes)
            }
        }
    }

    async fn get_revision_notes(
        &self,
        topic_id: &str,
        user_id: &str,
    ) -> Result<Option<RevisionNotes>> {
        let inner = self.inner.read().await;
        Ok(inner
            .revision_notes
            .iter()
            .find(|n| n.topic_id == topic_id && n.user_id == user_id)
            .cloned())
    }

    async fn delete_topic_revision_notes(&self, topic_id: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(drain_where(&mut inner.revision_notes, |n| n.topic_id == topic_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatScope;
    use scholia_types::RevisionNotesContent;

    fn scope(topic_id: &str, resource_id: &str) -> ChatScope {
        ChatScope {
            topic_id: topic_id.to_string(),
            resource_id: resource_id.to_string(),
            user_id: "u1".to_string(),
        }
    }

    fn notes(title: &str) -> RevisionNotesContent {
        RevisionNotesContent {
            title: title.to_string(),
            introduction: "intro".to_string(),
            core_concepts: vec!["a".to_string()],
            example_or_use_case: "example".to_string(),
            common_confusions: vec![],
            memory_tips: "tips".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_turn_on_missing_chat_fails() {
        let store = MemoryPersistenceClient::new();
        let mut chat = Chat::new_root(scope("t", "r")).into_chat();
        let turn = chat.record_turn("q", "a", None, None);

        let err = store.append_turn(&chat.id, &turn).await.unwrap_err();
        assert!(matches!(err, PersistError::ChatNotFound(_)));
    }

    #[tokio::test]
    async fn test_root_listing_skips_branches_and_is_newest_first() {
        let store = MemoryPersistenceClient::new();
        let first = Chat::new_root(scope("t", "r1"));
        let second = Chat::new_root(scope("t", "r2"));
        let branch = first.branch(scope("t", "r1"));

        store.insert_chat(first.as_chat()).await.unwrap();
        store.insert_chat(second.as_chat()).await.unwrap();
        store.insert_chat(&branch).await.unwrap();

        let roots = store.list_root_chats("t", "u1").await.unwrap();
        let ids: Vec<&str> = roots.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![second.id(), first.id()]);

        let history = store.list_resource_chats("r1", "u1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id());
    }

    #[tokio::test]
    async fn test_folders_are_scoped_to_owner() {
        let store = MemoryPersistenceClient::new();
        let folder = store
            .create_folder(NewFolder {
                name: "Maths".to_string(),
                user_id: "u1".to_string(),
                cover_path: None,
            })
            .await
            .unwrap();

        assert_eq!(store.list_folders("u1").await.unwrap(), vec![folder.clone()]);
        assert!(store.list_folders("u2").await.unwrap().is_empty());

        assert!(!store.delete_folder(&folder.id, "u2").await.unwrap());
        assert!(store.delete_folder(&folder.id, "u1").await.unwrap());
        assert!(store.get_folder(&folder.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chat_delete_failure_switch() {
        let store = MemoryPersistenceClient::new();
        let root = Chat::new_root(scope("t", "r"));
        store.insert_chat(root.as_chat()).await.unwrap();

        store.fail_chat_deletes(true);
        assert!(store.delete_topic_chats("t").await.is_err());
        assert!(store.get_chat(root.id()).await.unwrap().is_some());

        store.fail_chat_deletes(false);
        assert_eq!(store.delete_topic_chats("t").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revision_notes_upsert_keeps_identity() {
        let store = MemoryPersistenceClient::new();
        let first = store
            .upsert_revision_notes(RevisionNotes::new("t", "u1", notes("v1")))
            .await
            .unwrap();
        let second = store
            .upsert_revision_notes(RevisionNotes::new("t", "u1", notes("v2")))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.content.title, "v2");
        let stored = store.get_revision_notes("t", "u1").await.unwrap().unwrap();
        assert_eq!(stored.content.title, "v2");
    }
}
