use async_trait::async_trait;
use bson::doc;
use mongodb::{Client, Database};

use super::models::{MongoChat, MongoFlashcardDeck, MongoFolder, MongoResource, MongoTopic};
use super::parse_oid;
use super::repositories::{
    MongoChatRepository, MongoFlashcardRepository, MongoFolderRepository,
    MongoResourceRepository, MongoRevisionNotesRepository, MongoTopicRepository,
};
use crate::error::{PersistError, Result};
use crate::models::{
    Chat, ChatTurn, FlashcardDeck, Folder, NewFolder, NewTopic, Resource, RevisionNotes, Topic,
};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    db: Database,
    chat_repo: MongoChatRepository,
    resource_repo: MongoResourceRepository,
    folder_repo: MongoFolderRepository,
    topic_repo: MongoTopicRepository,
    flashcard_repo: MongoFlashcardRepository,
    notes_repo: MongoRevisionNotesRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        let db = client.database(database);
        let persist = Self {
            chat_repo: MongoChatRepository::new(&db),
            resource_repo: MongoResourceRepository::new(&db),
            folder_repo: MongoFolderRepository::new(&db),
            topic_repo: MongoTopicRepository::new(&db),
            flashcard_repo: MongoFlashcardRepository::new(&db),
            notes_repo: MongoRevisionNotesRepository::new(&db),
            db,
        };

        persist.chat_repo.ensure_indexes().await?;
        persist.notes_repo.ensure_indexes().await?;
        tracing::debug!(database, "MongoDB indexes ensured");

        Ok(persist)
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let chat = self.chat_repo.get_chat(parse_oid(chat_id)?).await?;
        Ok(chat.map(Chat::from))
    }

    async fn insert_chat(&self, chat: &Chat) -> Result<()> {
        let mongo_chat = MongoChat::try_from(chat)?;
        self.chat_repo.insert_chat(&mongo_chat).await
    }

    async fn append_turn(&self, chat_id: &str, turn: &ChatTurn) -> Result<()> {
        let matched = self.chat_repo.append_turn(parse_oid(chat_id)?, turn).await?;
        if matched == 0 {
            return Err(PersistError::ChatNotFound(chat_id.to_string()));
        }
        Ok(())
    }

    async fn list_resource_chats(&self, resource_id: &str, user_id: &str) -> Result<Vec<Chat>> {
        let chats = self.chat_repo
            .list_by_resource(parse_oid(resource_id)?, user_id)
            .await?;
        Ok(chats.into_iter().map(Chat::from).collect())
    }

    async fn list_root_chats(&self, topic_id: &str, user_id: &str) -> Result<Vec<Chat>> {
        let chats = self.chat_repo
            .list_roots_by_topic(parse_oid(topic_id)?, user_id)
            .await?;
        Ok(chats.into_iter().map(Chat::from).collect())
    }

    async fn delete_resource_chats(&self, resource_id: &str) -> Result<u64> {
        self.chat_repo.delete_by_resource(parse_oid(resource_id)?).await
    }

    async fn delete_topic_chats(&self, topic_id: &str) -> Result<u64> {
        self.chat_repo.delete_by_topic(parse_oid(topic_id)?).await
    }

    async fn insert_resource(&self, resource: &Resource) -> Result<()> {
        let mongo_resource = MongoResource::try_from(resource)?;
        self.resource_repo.insert_resource(&mongo_resource).await
    }

    async fn get_resource(&self, resource_id: &str) -> Result<Option<Resource>> {
        let resource = self.resource_repo.get_resource(parse_oid(resource_id)?).await?;
        Ok(resource.map(Resource::from))
    }

    async fn list_topic_resources(&self, topic_id: &str) -> Result<Vec<Resource>> {
        let resources = self.resource_repo.list_by_topic(parse_oid(topic_id)?).await?;
        Ok(resources.into_iter().map(Resource::from).collect())
    }

    async fn delete_resource(&self, resource_id: &str) -> Result<bool> {
        self.resource_repo.delete_resource(parse_oid(resource_id)?).await
    }

    async fn delete_topic_resources(&self, topic_id: &str) -> Result<u64> {
        self.resource_repo.delete_by_topic(parse_oid(topic_id)?).await
    }

    async fn create_folder(&self, folder: NewFolder) -> Result<Folder> {
        let folder = Folder::from(folder);
        self.folder_repo.insert_folder(&MongoFolder::try_from(&folder)?).await?;
        Ok(folder)
    }

    async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>> {
        let folder = self.folder_repo.get_folder(parse_oid(folder_id)?).await?;
        Ok(folder.map(Folder::from))
    }

    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>> {
        let folders = self.folder_repo.list_folders(user_id).await?;
        Ok(folders.into_iter().map(Folder::from).collect())
    }

    async fn delete_folder(&self, folder_id: &str, user_id: &str) -> Result<bool> {
        self.folder_repo.delete_folder(parse_oid(folder_id)?, user_id).await
    }

    async fn create_topic(&self, topic: NewTopic) -> Result<Topic> {
        let topic = Topic::from(topic);
        self.topic_repo.insert_topic(&MongoTopic::try_from(&topic)?).await?;
        Ok(topic)
    }

    async fn get_topic(&self, topic_id: &str) -> Result<Option<Topic>> {
        let topic = self.topic_repo.get_topic(parse_oid(topic_id)?).await?;
        Ok(topic.map(Topic::from))
    }

    async fn find_topic_by_title(
        &self,
        title: &str,
        folder_id: &str,
        user_id: &str,
    ) -> Result<Option<Topic>> {
        let topic = self.topic_repo
            .find_by_title(title, parse_oid(folder_id)?, user_id)
            .await?;
        Ok(topic.map(Topic::from))
    }

    async fn list_topics(&self, folder_id: &str, user_id: &str) -> Result<Vec<Topic>> {
        let topics = self.topic_repo.list_topics(parse_oid(folder_id)?, user_id).await?;
        Ok(topics.into_iter().map(Topic::from).collect())
    }

    async fn delete_topic(&self, topic_id: &str, user_id: &str) -> Result<bool> {
        self.topic_repo.delete_topic(parse_oid(topic_id)?, user_id).await
    }

    async fn insert_flashcards(&self, deck: &FlashcardDeck) -> Result<()> {
        let mongo_deck = MongoFlashcardDeck::try_from(deck)?;
        self.flashcard_repo.insert_deck(&mongo_deck).await
    }

    async fn latest_flashcards(
        &self,
        topic_id: &str,
        user_id: &str,
    ) -> Result<Option<FlashcardDeck>> {
        let deck = self.flashcard_repo.latest_deck(parse_oid(topic_id)?, user_id).await?;
        Ok(deck.map(FlashcardDeck::from))
    }

    async fn delete_topic_flashcards(&self, topic_id: &str) -> Result<u64> {
        self.flashcard_repo.delete_by_topic(parse_oid(topic_id)?).await
    }

    async fn upsert_revision_notes(&self, notes: RevisionNotes) -> Result<RevisionNotes> {
        let stored = self.notes_repo
            .upsert_notes(parse_oid(&notes.topic_id)?, &notes)
            .await?
            .ok_or_else(|| PersistError::Internal("revision notes vanished after upsert".to_string()))?;
        Ok(stored.into())
    }

    async fn get_revision_notes(
        &self,
        topic_id: &str,
        user_id: &str,
    ) -> Result<Option<RevisionNotes>> {
        let notes = self.notes_repo.get_notes(parse_oid(topic_id)?, user_id).await?;
        Ok(notes.map(RevisionNotes::from))
    }

    async fn delete_topic_revision_notes(&self, topic_id: &str) -> Result<u64> {
        self.notes_repo.delete_by_topic(parse_oid(topic_id)?).await
    }
}
