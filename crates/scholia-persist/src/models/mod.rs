mod artifacts;
mod chat;
mod folder;
mod resource;
mod topic;

pub use artifacts::{FlashcardDeck, RevisionNotes};
pub use chat::{Chat, ChatKind, ChatScope, ChatTurn, RootChat};
pub use folder::{Folder, NewFolder};
pub use resource::{Resource, ResourceKind};
pub use topic::{NewTopic, Topic};

use bson::oid::ObjectId;

/// Generate a fresh document id (24-char hex ObjectId)
pub fn new_id() -> String {
    ObjectId::new().to_hex()
}

pub fn is_valid_id(id: &str) -> bool {
    ObjectId::parse_str(id).is_ok()
}
