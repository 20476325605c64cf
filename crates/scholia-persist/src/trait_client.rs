use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Chat, ChatTurn, FlashcardDeck, Folder, NewFolder, NewTopic, Resource, RevisionNotes, Topic,
};

/// Trait for database persistence operations
///
/// Implementations provide database-specific CRUD operations. Ids are the
/// 24-char hex strings produced by [`crate::new_id`].
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Cheap round-trip used by health checks
    async fn ping(&self) -> Result<()>;

    // Chats

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>>;

    /// Insert a thread together with its first exchange
    async fn insert_chat(&self, chat: &Chat) -> Result<()>;

    /// Append a turn's messages and overwrite the summary of an existing thread.
    ///
    /// Fails with [`crate::PersistError::ChatNotFound`] if the thread is gone.
    async fn append_turn(&self, chat_id: &str, turn: &ChatTurn) -> Result<()>;

    /// All threads (roots and branches) of a resource, oldest first
    async fn list_resource_chats(&self, resource_id: &str, user_id: &str) -> Result<Vec<Chat>>;

    /// Root threads of a topic, newest first
    async fn list_root_chats(&self, topic_id: &str, user_id: &str) -> Result<Vec<Chat>>;

    async fn delete_resource_chats(&self, resource_id: &str) -> Result<u64>;

    async fn delete_topic_chats(&self, topic_id: &str) -> Result<u64>;

    // Resources

    async fn insert_resource(&self, resource: &Resource) -> Result<()>;

    async fn get_resource(&self, resource_id: &str) -> Result<Option<Resource>>;

    async fn list_topic_resources(&self, topic_id: &str) -> Result<Vec<Resource>>;

    /// Returns whether a resource was removed
    async fn delete_resource(&self, resource_id: &str) -> Result<bool>;

    async fn delete_topic_resources(&self, topic_id: &str) -> Result<u64>;

    // Folders

    async fn create_folder(&self, folder: NewFolder) -> Result<Folder>;

    async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>>;

    /// Folders of a user, oldest first
    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>>;

    /// Returns whether a folder owned by `user_id` was removed
    async fn delete_folder(&self, folder_id: &str, user_id: &str) -> Result<bool>;

    // Topics

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic>;

    async fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>>;

    async fn find_topic_by_title(
        &self,
        title: &str,
        folder_id: &str,
        user_id: &str,
    ) -> Result<Option<Topic>>;

    async fn list_topics(&self, folder_id: &str, user_id: &str) -> Result<Vec<Topic>>;

    /// Returns whether a topic owned by `user_id` was removed
    async fn delete_topic(&self, topic_id: &str, user_id: &str) -> Result<bool>;

    // Study artifacts

    async fn insert_flashcards(&self, deck: &FlashcardDeck) -> Result<()>;

    async fn latest_flashcards(&self, topic_id: &str, user_id: &str)
        -> Result<Option<FlashcardDeck>>;

    async fn delete_topic_flashcards(&self, topic_id: &str) -> Result<u64>;

    /// Insert or overwrite the notes for `(notes.topic_id, notes.user_id)`.
    ///
    /// The stored document keeps its original id and `created_at`.
    async fn upsert_revision_notes(&self, notes: RevisionNotes) -> Result<RevisionNotes>;

    async fn get_revision_notes(&self, topic_id: &str, user_id: &str)
        -> Result<Option<RevisionNotes>>;

    async fn delete_topic_revision_notes(&self, topic_id: &str) -> Result<u64>;
}
