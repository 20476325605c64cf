use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scholia_types::{ChatMessage, ChatMode, Flashcard, RevisionNotesContent};

use super::parse_oid;
use crate::error::{PersistError, Result};
use crate::models::{Chat, FlashcardDeck, Folder, Resource, ResourceKind, RevisionNotes, Topic};

/// MongoDB-specific chat thread (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChat {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub resource_id: ObjectId,
    pub user_id: String,
    /// Stored as explicit null for roots so `{parent_chat_id: null}` matches
    pub parent_chat_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<ChatMode>,
    pub messages: Vec<ChatMessage>,
    pub summary: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoResource {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub source: Vec<String>,
    pub content: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoFolder {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTopic {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub folder_id: ObjectId,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoFlashcardDeck {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub user_id: String,
    pub topic: String,
    pub flashcards: Vec<Flashcard>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRevisionNotes {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub user_id: String,
    #[serde(flatten)]
    pub content: RevisionNotesContent,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

// Conversions between database-agnostic and MongoDB-specific models

impl TryFrom<&Chat> for MongoChat {
    type Error = PersistError;

    fn try_from(chat: &Chat) -> Result<Self> {
        Ok(Self {
            id: parse_oid(&chat.id)?,
            topic_id: parse_oid(&chat.topic_id)?,
            resource_id: parse_oid(&chat.resource_id)?,
            user_id: chat.user_id.clone(),
            parent_chat_id: chat.parent_chat_id().map(parse_oid).transpose()?,
            mode_id: chat.mode_id,
            messages: chat.messages.clone(),
            summary: chat.summary.clone(),
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        })
    }
}

impl From<MongoChat> for Chat {
    fn from(chat: MongoChat) -> Self {
        Self {
            id: chat.id.to_hex(),
            topic_id: chat.topic_id.to_hex(),
            resource_id: chat.resource_id.to_hex(),
            user_id: chat.user_id,
            parent_chat_id: chat.parent_chat_id.map(|id| id.to_hex()),
            mode_id: chat.mode_id,
            messages: chat.messages,
            summary: chat.summary,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

impl TryFrom<&Resource> for MongoResource {
    type Error = PersistError;

    fn try_from(resource: &Resource) -> Result<Self> {
        Ok(Self {
            id: parse_oid(&resource.id)?,
            topic_id: parse_oid(&resource.topic_id)?,
            user_id: resource.user_id.clone(),
            kind: resource.kind,
            source: resource.source.clone(),
            content: resource.content.clone(),
            created_at: resource.created_at,
        })
    }
}

impl From<MongoResource> for Resource {
    fn from(resource: MongoResource) -> Self {
        Self {
            id: resource.id.to_hex(),
            topic_id: resource.topic_id.to_hex(),
            user_id: resource.user_id,
            kind: resource.kind,
            source: resource.source,
            content: resource.content,
            created_at: resource.created_at,
        }
    }
}

impl TryFrom<&Folder> for MongoFolder {
    type Error = PersistError;

    fn try_from(folder: &Folder) -> Result<Self> {
        Ok(Self {
            id: parse_oid(&folder.id)?,
            name: folder.name.clone(),
            user_id: folder.user_id.clone(),
            cover_path: folder.cover_path.clone(),
            created_at: folder.created_at,
        })
    }
}

impl From<MongoFolder> for Folder {
    fn from(folder: MongoFolder) -> Self {
        Self {
            id: folder.id.to_hex(),
            name: folder.name,
            user_id: folder.user_id,
            cover_path: folder.cover_path,
            created_at: folder.created_at,
        }
    }
}

impl TryFrom<&Topic> for MongoTopic {
    type Error = PersistError;

    fn try_from(topic: &Topic) -> Result<Self> {
        Ok(Self {
            id: parse_oid(&topic.id)?,
            title: topic.title.clone(),
            folder_id: parse_oid(&topic.folder_id)?,
            user_id: topic.user_id.clone(),
            cover_path: topic.cover_path.clone(),
            created_at: topic.created_at,
        })
    }
}

impl From<MongoTopic> for Topic {
    fn from(topic: MongoTopic) -> Self {
        Self {
            id: topic.id.to_hex(),
            title: topic.title,
            folder_id: topic.folder_id.to_hex(),
            user_id: topic.user_id,
            cover_path: topic.cover_path,
            created_at: topic.created_at,
        }
    }
}

impl TryFrom<&FlashcardDeck> for MongoFlashcardDeck {
    type Error = PersistError;

    fn try_from(deck: &FlashcardDeck) -> Result<Self> {
        Ok(Self {
            id: parse_oid(&deck.id)?,
            topic_id: parse_oid(&deck.topic_id)?,
            user_id: deck.user_id.clone(),
            topic: deck.topic.clone(),
            flashcards: deck.flashcards.clone(),
            created_at: deck.created_at,
        })
    }
}

impl From<MongoFlashcardDeck> for FlashcardDeck {
    fn from(deck: MongoFlashcardDeck) -> Self {
        Self {
            id: deck.id.to_hex(),
            topic_id: deck.topic_id.to_hex(),
            user_id: deck.user_id,
            topic: deck.topic,
            flashcards: deck.flashcards,
            created_at: deck.created_at,
        }
    }
}

impl From<MongoRevisionNotes> for RevisionNotes {
    fn from(notes: MongoRevisionNotes) -> Self {
        Self {
            id: notes.id.to_hex(),
            topic_id: notes.topic_id.to_hex(),
            user_id: notes.user_id,
            content: notes.content,
            created_at: notes.created_at,
            updated_at: notes.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatScope;

    #[test]
    fn test_chat_round_trips_through_mongo_model() {
        let root = Chat::new_root(ChatScope {
            topic_id: crate::new_id(),
            resource_id: crate::new_id(),
            user_id: "u1".to_string(),
        });
        let branch = root.branch(ChatScope {
            topic_id: crate::new_id(),
            resource_id: crate::new_id(),
            user_id: "u1".to_string(),
        });

        let mongo = MongoChat::try_from(&branch).unwrap();
        assert_eq!(mongo.parent_chat_id.map(|id| id.to_hex()).as_deref(), Some(root.id()));

        let back: Chat = mongo.into();
        assert_eq!(back.parent_chat_id(), Some(root.id()));
        assert_eq!(back.id, branch.id);
    }

    #[test]
    fn test_root_chat_stores_explicit_null_parent() {
        let root = Chat::new_root(ChatScope {
            topic_id: crate::new_id(),
            resource_id: crate::new_id(),
            user_id: "u1".to_string(),
        })
        .into_chat();

        let doc = bson::to_document(&MongoChat::try_from(&root).unwrap()).unwrap();
        assert_eq!(doc.get("parent_chat_id"), Some(&bson::Bson::Null));
        assert!(doc.get_datetime("created_at").is_ok());
    }

    #[test]
    fn test_folder_round_trips_through_mongo_model() {
        let folder = Folder::from(crate::models::NewFolder {
            name: "Semester 1".to_string(),
            user_id: "u1".to_string(),
            cover_path: None,
        });

        let doc = bson::to_document(&MongoFolder::try_from(&folder).unwrap()).unwrap();
        assert!(doc.get("cover_path").is_none());
        assert_eq!(doc.get_str("name").unwrap(), "Semester 1");

        let back: Folder = bson::from_document::<MongoFolder>(doc).unwrap().into();
        assert_eq!(back.id, folder.id);
        assert_eq!(back.name, folder.name);
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let chat = Chat::new_root(ChatScope {
            topic_id: "not-an-id".to_string(),
            resource_id: crate::new_id(),
            user_id: "u1".to_string(),
        })
        .into_chat();

        let err = MongoChat::try_from(&chat).unwrap_err();
        assert!(matches!(err, PersistError::InvalidObjectId(_)));
    }
}
