use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::dbs::mongo::models::MongoResource;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoResourceRepository {
    collection: Collection<MongoResource>,
}

impl MongoResourceRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("resources");
        Self { collection }
    }

    pub async fn insert_resource(&self, resource: &MongoResource) -> Result<()> {
        self.collection.insert_one(resource).await?;
        Ok(())
    }

    pub async fn get_resource(&self, resource_id: ObjectId) -> Result<Option<MongoResource>> {
        Ok(self.collection.find_one(doc! { "_id": resource_id }).await?)
    }

    pub async fn list_by_topic(&self, topic_id: ObjectId) -> Result<Vec<MongoResource>> {
        let resources = self.collection
            .find(doc! { "topic_id": topic_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(resources)
    }

    pub async fn delete_resource(&self, resource_id: ObjectId) -> Result<bool> {
        let result = self.collection
            .delete_one(doc! { "_id": resource_id })
            .await?;
        Ok(result.deleted_count > 0)
    }

    pub async fn delete_by_topic(&self, topic_id: ObjectId) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "topic_id": topic_id })
            .await?;
        Ok(result.deleted_count)
    }
}
