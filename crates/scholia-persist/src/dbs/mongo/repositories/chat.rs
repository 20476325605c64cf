use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};

use crate::dbs::mongo::models::MongoChat;
use crate::error::Result;
use crate::models::ChatTurn;

#[derive(Clone)]
pub struct MongoChatRepository {
    collection: Collection<MongoChat>,
}

impl MongoChatRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("chats");
        Self { collection }
    }

    /// Indexes backing the resource history and root-thread queries
    pub async fn ensure_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "resource_id": 1, "user_id": 1, "created_at": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "topic_id": 1, "user_id": 1, "parent_chat_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("topic_roots".to_string()).build())
                .build(),
        ];
        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    pub async fn insert_chat(&self, chat: &MongoChat) -> Result<()> {
        self.collection.insert_one(chat).await?;
        Ok(())
    }

    pub async fn get_chat(&self, chat_id: ObjectId) -> Result<Option<MongoChat>> {
        let filter = doc! { "_id": chat_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Push the turn's messages and overwrite the summary.
    ///
    /// Returns the number of matched documents (0 or 1).
    pub async fn append_turn(&self, chat_id: ObjectId, turn: &ChatTurn) -> Result<u64> {
        let mut set = doc! {
            "summary": turn.summary.clone(),
            "updated_at": bson::DateTime::from_chrono(turn.updated_at),
        };
        if let Some(mode) = turn.mode_id {
            set.insert("mode_id", mode.id());
        }

        let filter = doc! { "_id": chat_id };
        let update = doc! {
            "$push": { "messages": { "$each": bson::to_bson(&turn.messages)? } },
            "$set": set,
        };

        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count)
    }

    pub async fn list_by_resource(
        &self,
        resource_id: ObjectId,
        user_id: &str,
    ) -> Result<Vec<MongoChat>> {
        let filter = doc! { "resource_id": resource_id, "user_id": user_id };
        let chats = self.collection
            .find(filter)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(chats)
    }

    pub async fn list_roots_by_topic(
        &self,
        topic_id: ObjectId,
        user_id: &str,
    ) -> Result<Vec<MongoChat>> {
        let filter = doc! { "topic_id": topic_id, "user_id": user_id, "parent_chat_id": null };
        let chats = self.collection
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(chats)
    }

    pub async fn delete_by_resource(&self, resource_id: ObjectId) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "resource_id": resource_id })
            .await?;
        Ok(result.deleted_count)
    }

    pub async fn delete_by_topic(&self, topic_id: ObjectId) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "topic_id": topic_id })
            .await?;
        Ok(result.deleted_count)
    }
}
