use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scholia_types::{Flashcard, FlashcardSet, RevisionNotesContent};

/// One generated flashcard set. Every generation inserts a new deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardDeck {
    pub id: String,
    pub topic_id: String,
    pub user_id: String,
    pub topic: String,
    pub flashcards: Vec<Flashcard>,
    pub created_at: DateTime<Utc>,
}

impl FlashcardDeck {
    pub fn new(topic_id: impl Into<String>, user_id: impl Into<String>, set: FlashcardSet) -> Self {
        Self {
            id: super::new_id(),
            topic_id: topic_id.into(),
            user_id: user_id.into(),
            topic: set.topic,
            flashcards: set.flashcards,
            created_at: Utc::now(),
        }
    }
}

/// Revision notes; at most one per (topic, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionNotes {
    pub id: String,
    pub topic_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub content: RevisionNotesContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RevisionNotes {
    pub fn new(
        topic_id: impl Into<String>,
        user_id: impl Into<String>,
        content: RevisionNotesContent,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            topic_id: topic_id.into(),
            user_id: user_id.into(),
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
