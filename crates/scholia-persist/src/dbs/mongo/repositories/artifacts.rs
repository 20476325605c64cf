use bson::{doc, oid::ObjectId};
use mongodb::{options::IndexOptions, Collection, Database, IndexModel};

use crate::dbs::mongo::models::{MongoFlashcardDeck, MongoRevisionNotes};
use crate::dbs::mongo::parse_oid;
use crate::error::Result;
use crate::models::RevisionNotes;

#[derive(Clone)]
pub struct MongoFlashcardRepository {
    collection: Collection<MongoFlashcardDeck>,
}

impl MongoFlashcardRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("flashcards");
        Self { collection }
    }

    pub async fn insert_deck(&self, deck: &MongoFlashcardDeck) -> Result<()> {
        self.collection.insert_one(deck).await?;
        Ok(())
    }

    pub async fn latest_deck(
        &self,
        topic_id: ObjectId,
        user_id: &str,
    ) -> Result<Option<MongoFlashcardDeck>> {
        let deck = self.collection
            .find_one(doc! { "topic_id": topic_id, "user_id": user_id })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;
        Ok(deck)
    }

    pub async fn delete_by_topic(&self, topic_id: ObjectId) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "topic_id": topic_id })
            .await?;
        Ok(result.deleted_count)
    }
}

#[derive(Clone)]
pub struct MongoRevisionNotesRepository {
    collection: Collection<MongoRevisionNotes>,
}

impl MongoRevisionNotesRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection("revision_notes");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "topic_id": 1, "user_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    /// Overwrite the notes for (topic, user), creating them if missing
    pub async fn upsert_notes(
        &self,
        topic_id: ObjectId,
        notes: &RevisionNotes,
    ) -> Result<Option<MongoRevisionNotes>> {
        let mut set = bson::to_document(&notes.content)?;
        set.insert("updated_at", bson::DateTime::from_chrono(notes.updated_at));

        let id = parse_oid(&notes.id)?;
        let filter = doc! { "topic_id": topic_id, "user_id": notes.user_id.as_str() };
        let update = doc! {
            "$set": set,
            "$setOnInsert": {
                "_id": id,
                "created_at": bson::DateTime::from_chrono(notes.created_at),
            },
        };

        self.collection.update_one(filter.clone(), update).upsert(true).await?;
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn get_notes(
        &self,
        topic_id: ObjectId,
        user_id: &str,
    ) -> Result<Option<MongoRevisionNotes>> {
        Ok(self.collection
            .find_one(doc! { "topic_id": topic_id, "user_id": user_id })
            .await?)
    }

    pub async fn delete_by_topic(&self, topic_id: ObjectId) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "topic_id": topic_id })
            .await?;
        Ok(result.deleted_count)
    }
}
