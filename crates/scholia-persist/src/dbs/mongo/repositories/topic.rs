use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::dbs::mongo::models::MongoTopic;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoTopicRepository {
    collection: Collection<MongoTopic>,
}

impl MongoTopicRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("topics");
        Self { collection }
    }

    pub async fn insert_topic(&self, topic: &MongoTopic) -> Result<()> {
        self.collection.insert_one(topic).await?;
        Ok(())
    }

    pub async fn get_topic(&self, topic_id: ObjectId) -> Result<Option<MongoTopic>> {
        Ok(self.collection.find_one(doc! { "_id": topic_id }).await?)
    }

    pub async fn find_by_title(
        &self,
        title: &str,
        folder_id: ObjectId,
        user_id: &str,
    ) -> Result<Option<MongoTopic>> {
        let filter = doc! { "title": title, "folder_id": folder_id, "user_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn list_topics(&self, folder_id: ObjectId, user_id: &str) -> Result<Vec<MongoTopic>> {
        let topics = self.collection
            .find(doc! { "folder_id": folder_id, "user_id": user_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(topics)
    }

    pub async fn delete_topic(&self, topic_id: ObjectId, user_id: &str) -> Result<bool> {
        let result = self.collection
            .delete_one(doc! { "_id": topic_id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
