use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use crate::dbs::mongo::models::MongoFolder;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoFolderRepository {
    collection: Collection<MongoFolder>,
}

impl MongoFolderRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("folders");
        Self { collection }
    }

    pub async fn insert_folder(&self, folder: &MongoFolder) -> Result<()> {
        self.collection.insert_one(folder).await?;
        Ok(())
    }

    pub async fn get_folder(&self, folder_id: ObjectId) -> Result<Option<MongoFolder>> {
        Ok(self.collection.find_one(doc! { "_id": folder_id }).await?)
    }

    pub async fn list_folders(&self, user_id: &str) -> Result<Vec<MongoFolder>> {
        let folders = self.collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(folders)
    }

    pub async fn delete_folder(&self, folder_id: ObjectId, user_id: &str) -> Result<bool> {
        let result = self.collection
            .delete_one(doc! { "_id": folder_id, "user_id": user_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
